use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// The record linking a user to a module they are taking. The schema keeps
/// a UNIQUE (user_id, module_id) constraint, so a pair exists at most once
/// no matter how requests interleave.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    user_id: Uuid,
    module_id: Uuid,
    status: String,
    progress_percentage: f32,
    started_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn progress_percentage(&self) -> f32 {
        self.progress_percentage
    }

    pub async fn find_by_user_module(
        mm: &ModelManager,
        user_id: Uuid,
        module_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM user_progress WHERE user_id = $1 AND module_id = $2")
                .bind(user_id)
                .bind(module_id)
                .fetch_one(mm.executor())
                .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    /// Profile upsert + enrollment insert as one transaction. A concurrent
    /// enroll for the same pair loses on the unique constraint and surfaces
    /// as `DatabaseError::UniqueViolation`; nothing is half-written.
    pub async fn enroll(mm: &ModelManager, user_id: Uuid, module_id: Uuid) -> DatabaseResult<Self> {
        let mut tx = mm.begin().await?;

        super::UserProfile::ensure_exists_tx(&mut tx, user_id).await?;

        let created: Enrollment = sqlx::query_as(
            "INSERT INTO user_progress \
             (id, user_id, module_id, status, progress_percentage, started_at, last_accessed_at) \
             VALUES ($1, $2, $3, 'not_started', 0, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(module_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Hard delete, no archival. Returns the number of rows removed so the
    /// caller can distinguish "was not enrolled".
    pub async fn unenroll(
        mm: &ModelManager,
        user_id: Uuid,
        module_id: Uuid,
    ) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM user_progress WHERE user_id = $1 AND module_id = $2")
            .bind(user_id)
            .bind(module_id)
            .execute(mm.executor())
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_for_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}
