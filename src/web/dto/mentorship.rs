use serde::{Deserialize, Serialize};

use crate::model::entity::MentorshipSession;

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SessionRequestBody {
    pub topic: String,
    pub session_type: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SessionListResponse {
    pub success: bool,
    pub data: Vec<MentorshipSession>,
    pub total: i64,
}

impl SessionListResponse {
    pub fn ok(sessions: Vec<MentorshipSession>) -> Self {
        let total = sessions.len() as i64;
        Self {
            success: true,
            data: sessions,
            total,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SessionCreatedResponse {
    pub success: bool,
    pub data: MentorshipSession,
    pub message: String,
}

impl SessionCreatedResponse {
    pub fn ok(session: MentorshipSession) -> Self {
        Self {
            success: true,
            data: session,
            message: String::from("Mentorship session requested."),
        }
    }
}
