use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Scored quiz attempts feed the stats aggregation (30-day average score,
/// 7-day point sum). Recorded by the seeding CLI; the API only reads them.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct QuizAttempt {
    id: Uuid,
    user_id: Uuid,
    score_percentage: f32,
    points_earned: i32,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QuizAttemptCreate {
    pub user_id: Uuid,
    pub score_percentage: f32,
    pub points_earned: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResourceTyped for QuizAttempt {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::QuizAttempt
    }
}

impl QuizAttempt {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn score_percentage(&self) -> f32 {
        self.score_percentage
    }

    pub fn points_earned(&self) -> i32 {
        self.points_earned
    }

    pub async fn record(mm: &ModelManager, data: QuizAttemptCreate) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO quiz_attempts (id, user_id, score_percentage, points_earned, completed_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW())) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.score_percentage)
        .bind(data.points_earned)
        .bind(data.completed_at)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    pub async fn list_for_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM quiz_attempts WHERE user_id = $1 ORDER BY completed_at DESC",
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
