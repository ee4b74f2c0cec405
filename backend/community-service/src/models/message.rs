use chrono::{DateTime, Utc};
use cursor_pagination::Paginable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Private message joined with both participants' usernames
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageView {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub recipient_id: Uuid,
    pub recipient_username: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Paginable for MessageView {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Recipient username
    #[validate(length(min = 1, max = 32))]
    pub to: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}
