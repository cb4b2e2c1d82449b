use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    VideoCall,
    Chat,
}

impl TryFrom<&str> for SessionType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "video_call" => Ok(Self::VideoCall),
            "chat" => Ok(Self::Chat),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VideoCall => write!(f, "video_call"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Requested,
    Scheduled,
    Completed,
    Cancelled,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requested => write!(f, "requested"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A mentorship / help-desk session. Users request one with a topic; a
/// mentor and a slot get attached later by back-office tooling, which is
/// why the mentor fields are nullable. Cancelling flips the status instead
/// of deleting, sessions keep their history.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct MentorshipSession {
    id: Uuid,
    user_id: Uuid,
    mentor_name: Option<String>,
    mentor_expertise: Option<String>,
    session_type: String,
    topic: String,
    status: String,
    scheduled_at: Option<DateTime<Utc>>,
    meeting_url: Option<String>,
    rating: Option<i16>,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionRequest {
    pub topic: String,
    pub session_type: SessionType,
}

impl ResourceTyped for MentorshipSession {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::MentorshipSession
    }
}

impl MentorshipSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Completed and cancelled sessions are history and cannot change.
    pub fn is_closed(&self) -> bool {
        self.status == SessionStatus::Completed.to_string()
            || self.status == SessionStatus::Cancelled.to_string()
    }

    pub async fn list_for_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM mentorship_sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn request(
        mm: &ModelManager,
        user_id: Uuid,
        data: SessionRequest,
    ) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            "INSERT INTO mentorship_sessions (id, user_id, session_type, topic, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(data.session_type.to_string())
        .bind(&data.topic)
        .bind(SessionStatus::Requested.to_string())
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM mentorship_sessions WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    pub async fn cancel(self, mm: &ModelManager) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            "UPDATE mentorship_sessions SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(SessionStatus::Cancelled.to_string())
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;
        Ok(updated)
    }
}

#[async_trait]
impl HasOwner for MentorshipSession {
    type OwnerId = uuid::Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.user_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn session_type_parses() {
        assert_eq!(SessionType::try_from("video_call"), Ok(SessionType::VideoCall));
        assert_eq!(SessionType::try_from("chat"), Ok(SessionType::Chat));
        assert!(SessionType::try_from("carrier_pigeon").is_err());
    }
}
