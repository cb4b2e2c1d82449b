use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Difficulty tiers a module can be published under. Stored as TEXT,
/// validated at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TryFrom<&str> for DifficultyLevel {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct TrainingModule {
    id: Uuid,
    title: String,
    description: String,
    difficulty_level: String,
    category: String,
    estimated_duration: Option<i32>,
    prerequisites: Option<String>,
    thumbnail_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ModuleCreate {
    pub title: String,
    pub description: String,
    pub difficulty_level: String,
    pub category: String,
    pub estimated_duration: Option<i32>,
    pub prerequisites: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl ResourceTyped for TrainingModule {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::TrainingModule
    }
}

impl TrainingModule {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn difficulty_level(&self) -> &str {
        &self.difficulty_level
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[async_trait]
impl CrudRepository<TrainingModule, ModuleCreate, uuid::Uuid> for TrainingModule {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ModuleCreate,
    ) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO training_modules \
             (id, title, description, difficulty_level, category, estimated_duration, prerequisites, thumbnail_url) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.difficulty_level)
        .bind(&data.category)
        .bind(data.estimated_duration)
        .bind(&data.prerequisites)
        .bind(&data.thumbnail_url)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ModuleCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE training_modules SET title = $1, description = $2, difficulty_level = $3, \
             category = $4, estimated_duration = $5, prerequisites = $6, thumbnail_url = $7 \
             WHERE id = $8",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.difficulty_level)
        .bind(&data.category)
        .bind(data.estimated_duration)
        .bind(&data.prerequisites)
        .bind(&data.thumbnail_url)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.title = data.title;
        self.description = data.description;
        self.difficulty_level = data.difficulty_level;
        self.category = data.category;
        self.estimated_duration = data.estimated_duration;
        self.prerequisites = data.prerequisites;
        self.thumbnail_url = data.thumbnail_url;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM training_modules WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: uuid::Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM training_modules WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM training_modules LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM training_modules")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl TrainingModule {
    /// Enrollment only targets modules that are still published.
    pub async fn find_active(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM training_modules WHERE id = $1 AND is_active = true")
                .bind(id)
                .fetch_one(mm.executor())
                .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }
}

impl_paginatable_for!(TrainingModule, ModuleCreate, Uuid);

#[async_trait]
impl HasOwner for TrainingModule {
    type OwnerId = uuid::Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.id) // modules are system resources, they own themselves
    }
}

// Utils

#[derive(Debug, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub enrolled_only: bool,
}

/// One catalog entry: the module row plus the aggregates the dashboards
/// render (lesson count, distinct enrollments, caller's own progress).
#[derive(Debug, sqlx::FromRow)]
pub struct ModuleCatalogRow {
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

static CATALOG_BASE: &str = r#"
    SELECT
        tm.*,
        COUNT(l.id) AS total_lessons,
        COALESCE(ue.enrollment_count, 0) AS enrollment_count,
        CASE
            WHEN $1::uuid IS NOT NULL THEN EXISTS (
                SELECT 1 FROM user_progress up
                WHERE up.user_id = $1 AND up.module_id = tm.id
            )
            ELSE false
        END AS is_enrolled,
        CASE
            WHEN $1::uuid IS NOT NULL THEN (
                SELECT COALESCE(AVG(up.progress_percentage), 0)::float8
                FROM user_progress up
                WHERE up.user_id = $1 AND up.module_id = tm.id
            )
            ELSE 0::float8
        END AS progress,
        CASE
            WHEN $1::uuid IS NOT NULL THEN (
                SELECT COUNT(*)
                FROM user_progress up
                WHERE up.user_id = $1 AND up.module_id = tm.id AND up.status = 'completed'
            )
            ELSE 0::int8
        END AS lessons_completed
    FROM training_modules tm
    LEFT JOIN lessons l ON tm.id = l.module_id
    LEFT JOIN (
        SELECT module_id, COUNT(DISTINCT user_id) AS enrollment_count
        FROM user_progress
        GROUP BY module_id
    ) ue ON tm.id = ue.module_id
    WHERE tm.is_active = true
"#;

impl ModuleCatalogRow {
    pub async fn fetch_filtered(
        mm: &ModelManager,
        user_id: Option<Uuid>,
        filter: &CatalogFilter,
    ) -> DatabaseResult<Vec<Self>> {
        let mut sql = String::from(CATALOG_BASE);
        let mut param = 1; // $1 is always the (nullable) caller id

        if filter.category.is_some() {
            param += 1;
            sql.push_str(&format!(" AND LOWER(tm.category) = LOWER(${param})"));
        }

        if filter.difficulty.is_some() {
            param += 1;
            sql.push_str(&format!(" AND tm.difficulty_level = ${param}"));
        }

        // Meaningless without a caller, silently skipped.
        if filter.enrolled_only && user_id.is_some() {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM user_progress up \
                 WHERE up.user_id = $1 AND up.module_id = tm.id)",
            );
        }

        sql.push_str(" GROUP BY tm.id, ue.enrollment_count ORDER BY tm.created_at DESC");

        let mut query = sqlx::query_as::<_, ModuleCatalogRow>(&sql).bind(user_id);
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }
        if let Some(difficulty) = &filter.difficulty {
            query = query.bind(difficulty);
        }

        let rows = query.fetch_all(mm.executor()).await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn difficulty_accepts_known_levels() {
        assert_eq!(
            DifficultyLevel::try_from("beginner"),
            Ok(DifficultyLevel::Beginner)
        );
        assert_eq!(
            DifficultyLevel::try_from("advanced"),
            Ok(DifficultyLevel::Advanced)
        );
    }

    #[test]
    fn difficulty_rejects_unknown_levels() {
        assert!(DifficultyLevel::try_from("expert").is_err());
        assert!(DifficultyLevel::try_from("Beginner").is_err());
        assert!(DifficultyLevel::try_from("").is_err());
    }
}
