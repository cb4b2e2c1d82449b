use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Gamification sidecar of a user, created lazily on the first stats or
/// enroll call. `ensure_exists` is a single conditional insert, so two
/// racing requests cannot produce two rows or clobber earned points.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserProfile {
    user_id: Uuid,
    total_points: i32,
    current_streak: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for UserProfile {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserProfile
    }
}

impl UserProfile {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn total_points(&self) -> i32 {
        self.total_points
    }

    pub fn current_streak(&self) -> i32 {
        self.current_streak
    }

    pub async fn ensure_exists(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO user_profiles (user_id, total_points, current_streak) \
             VALUES ($1, 0, 0) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(mm.executor())
        .await?;
        Ok(())
    }

    /// Same upsert, but inside the caller's transaction (the enroll path).
    pub async fn ensure_exists_tx(
        tx: &mut Transaction<'static, Postgres>,
        user_id: Uuid,
    ) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO user_profiles (user_id, total_points, current_streak) \
             VALUES ($1, 0, 0) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }
}
