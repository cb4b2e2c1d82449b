use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::UserStatsRow;

/// Activities per week that count as 100% weekly progress. Fixed, not
/// configurable.
pub const WEEKLY_TARGET: i64 = 5;

/// `min(100, round(activity / target * 100))` — never exceeds 100 no
/// matter how active the week was.
pub fn weekly_progress(weekly_activity: i64) -> i64 {
    let pct = (weekly_activity as f64 / WEEKLY_TARGET as f64) * 100.0;
    (pct.round() as i64).min(100)
}

/// A display-ready aggregate metric. Color and icon metadata stay in the
/// clients; the backend only ships the numbers and labels.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatCard {
    pub id: String,
    pub title: String,
    pub value: String,
    #[serde(rename = "subValue")]
    pub sub_value: String,
}

impl StatCard {
    /// The four dashboard cards, in their fixed order.
    pub fn cards_from(raw: &UserStatsRow) -> Vec<StatCard> {
        let points_sub = if raw.weekly_points > 0 {
            format!("+{} this week", raw.weekly_points)
        } else {
            String::from("No points this week")
        };

        vec![
            StatCard {
                id: String::from("modules"),
                title: String::from("Training Modules"),
                value: raw.total_enrolled_modules.to_string(),
                sub_value: format!("{} completed", raw.completed_modules),
            },
            StatCard {
                id: String::from("points"),
                title: String::from("Total Points"),
                value: raw.total_points.to_string(),
                sub_value: points_sub,
            },
            StatCard {
                id: String::from("certificates"),
                title: String::from("Certificates"),
                value: raw.total_certificates.to_string(),
                sub_value: String::from("Gov verified"),
            },
            StatCard {
                id: String::from("progress"),
                title: String::from("Weekly Progress"),
                value: format!("{}%", weekly_progress(raw.weekly_activity)),
                sub_value: format!("Target: {WEEKLY_TARGET} activities"),
            },
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatsMetadata {
    pub user_id: Uuid,
    pub last_updated: DateTime<Utc>,
    pub raw_stats: UserStatsRow,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub data: Vec<StatCard>,
    pub metadata: StatsMetadata,
}

impl StatsResponse {
    pub fn ok(user_id: Uuid, raw: UserStatsRow) -> Self {
        let data = StatCard::cards_from(&raw);
        Self {
            success: true,
            data,
            metadata: StatsMetadata {
                user_id,
                last_updated: Utc::now(),
                raw_stats: raw,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn raw(weekly_activity: i64, weekly_points: i64) -> UserStatsRow {
        UserStatsRow {
            total_enrolled_modules: 3,
            completed_modules: 1,
            total_points: 120,
            total_badges: 2,
            total_certificates: 1,
            weekly_activity,
            current_streak: 4,
            avg_quiz_score: 87.5,
            weekly_points,
        }
    }

    #[test]
    fn weekly_progress_clamps_at_hundred() {
        assert_eq!(weekly_progress(12), 100);
        assert_eq!(weekly_progress(5), 100);
    }

    #[test]
    fn weekly_progress_scales_below_target() {
        assert_eq!(weekly_progress(0), 0);
        assert_eq!(weekly_progress(2), 40);
        assert_eq!(weekly_progress(3), 60);
    }

    #[test]
    fn cards_keep_their_fixed_order_and_values() {
        let cards = StatCard::cards_from(&raw(2, 30));
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].id, "modules");
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[0].sub_value, "1 completed");
        assert_eq!(cards[1].sub_value, "+30 this week");
        assert_eq!(cards[2].value, "1");
        assert_eq!(cards[3].value, "40%");
    }

    #[test]
    fn points_card_without_weekly_points() {
        let cards = StatCard::cards_from(&raw(0, 0));
        assert_eq!(cards[1].sub_value, "No points this week");
    }
}
