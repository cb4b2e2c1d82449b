use crate::model::{ModelManager, error::DatabaseResult};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// The dashboard aggregate, computed in a single pass over the user's
/// profile, enrollments, awards and quiz attempts. The profile row must
/// exist before fetching (`UserProfile::ensure_exists`), otherwise the CTE
/// yields no row.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserStatsRow {
    pub total_enrolled_modules: i64,
    pub completed_modules: i64,
    pub total_points: i32,
    pub total_badges: i64,
    pub total_certificates: i64,
    pub weekly_activity: i64,
    pub current_streak: i32,
    pub avg_quiz_score: f64,
    pub weekly_points: i64,
}

impl UserStatsRow {
    pub async fn fetch(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            WITH user_stats AS (
                SELECT
                    (SELECT COUNT(DISTINCT module_id) FROM user_progress
                     WHERE user_id = $1) AS total_enrolled_modules,
                    (SELECT COUNT(DISTINCT module_id) FROM user_progress
                     WHERE user_id = $1 AND status = 'completed') AS completed_modules,

                    COALESCE(up.total_points, 0) AS total_points,
                    (SELECT COUNT(*) FROM user_badges WHERE user_id = $1) AS total_badges,
                    (SELECT COUNT(*) FROM certificates WHERE user_id = $1) AS total_certificates,

                    (SELECT COUNT(*) FROM user_progress
                     WHERE user_id = $1
                     AND last_accessed_at >= NOW() - INTERVAL '7 days') AS weekly_activity,

                    COALESCE(up.current_streak, 0) AS current_streak,

                    (SELECT AVG(score_percentage) FROM quiz_attempts
                     WHERE user_id = $1
                     AND completed_at >= NOW() - INTERVAL '30 days') AS avg_recent_quiz_score,

                    (SELECT COALESCE(SUM(qa.points_earned), 0) FROM quiz_attempts qa
                     WHERE qa.user_id = $1
                     AND qa.completed_at >= NOW() - INTERVAL '7 days') AS weekly_points

                FROM user_profiles up
                WHERE up.user_id = $1
            )
            SELECT
                total_enrolled_modules,
                completed_modules,
                total_points,
                total_badges,
                total_certificates,
                weekly_activity,
                current_streak,
                ROUND(COALESCE(avg_recent_quiz_score, 0)::numeric, 1)::float8 AS avg_quiz_score,
                weekly_points
            FROM user_stats
            "#,
        )
        .bind(user_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }
}
