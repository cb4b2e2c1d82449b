use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{Enrollment, ModuleCatalogRow, TrainingModule};

/// Catalog entry: module fields plus the aggregates computed per request.
/// `is_enrolled`, `progress` and `lessons_completed` are always false/zero
/// for anonymous callers.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleCatalogEntry {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty_level: String,
    pub category: String,
    pub estimated_duration: Option<i32>,
    pub prerequisites: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub total_lessons: i64,
    pub enrollment_count: i64,
    pub is_enrolled: bool,
    pub progress: f64,
    pub lessons_completed: i64,
}

impl From<ModuleCatalogRow> for ModuleCatalogEntry {
    fn from(row: ModuleCatalogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            difficulty_level: row.difficulty_level,
            category: row.category,
            estimated_duration: row.estimated_duration,
            prerequisites: row.prerequisites,
            thumbnail_url: row.thumbnail_url,
            is_active: row.is_active,
            created_at: row.created_at,
            total_lessons: row.total_lessons,
            enrollment_count: row.enrollment_count,
            is_enrolled: row.is_enrolled,
            progress: row.progress,
            lessons_completed: row.lessons_completed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleListResponse {
    pub success: bool,
    pub data: Vec<ModuleCatalogEntry>,
    pub total: i64,
}

impl ModuleListResponse {
    pub fn ok(rows: Vec<ModuleCatalogRow>) -> Self {
        let data: Vec<ModuleCatalogEntry> =
            rows.into_iter().map(ModuleCatalogEntry::from).collect();
        let total = data.len() as i64;
        Self {
            success: true,
            data,
            total,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ModuleCreateBody {
    pub title: String,
    pub description: Option<String>,
    pub difficulty_level: String,
    pub category: String,
    pub estimated_duration: Option<i32>,
    pub prerequisites: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ModuleCreatedResponse {
    pub success: bool,
    pub data: TrainingModule,
    pub message: String,
}

impl ModuleCreatedResponse {
    pub fn ok(module: TrainingModule) -> Self {
        Self {
            success: true,
            data: module,
            message: String::from("Training module created successfully."),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EnrollmentInfo {
    pub enrollment: Enrollment,
    pub module: TrainingModule,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EnrollResponse {
    pub success: bool,
    pub data: EnrollmentInfo,
    pub message: String,
}

impl EnrollResponse {
    pub fn ok(enrollment: Enrollment, module: TrainingModule) -> Self {
        let message = format!("Successfully enrolled in {}", module.title());
        Self {
            success: true,
            data: EnrollmentInfo { enrollment, module },
            message,
        }
    }
}
