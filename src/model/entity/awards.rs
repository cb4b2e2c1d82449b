use crate::model::{ModelManager, error::DatabaseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

// Badges and certificates are counted by the stats aggregation and granted
// by the seeding CLI. Nothing else reads their contents, so they stay thin.

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserBadge {
    id: Uuid,
    user_id: Uuid,
    badge_name: String,
    awarded_at: DateTime<Utc>,
}

impl UserBadge {
    pub fn badge_name(&self) -> &str {
        &self.badge_name
    }

    pub async fn award(mm: &ModelManager, user_id: Uuid, badge_name: &str) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO user_badges (id, user_id, badge_name, awarded_at) \
             VALUES ($1, $2, $3, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(badge_name)
        .fetch_one(mm.executor())
        .await?;
        Ok(created)
    }

    pub async fn count_for_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_badges WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Certificate {
    id: Uuid,
    user_id: Uuid,
    title: String,
    issued_at: DateTime<Utc>,
}

impl Certificate {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub async fn issue(mm: &ModelManager, user_id: Uuid, title: &str) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO certificates (id, user_id, title, issued_at) \
             VALUES ($1, $2, $3, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .fetch_one(mm.executor())
        .await?;
        Ok(created)
    }

    pub async fn count_for_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM certificates WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(mm.executor())
                .await?;
        Ok(result)
    }
}
