use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub about: Option<String>,
    pub karma: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Profile as shown to other users
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub about: Option<String>,
    pub karma: i64,
    pub follower_count: i64,
    pub created_at: DateTime<Utc>,
}

impl PublicProfile {
    pub fn new(user: User, follower_count: i64) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            about: user.about,
            karma: user.karma,
            follower_count,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub about: Option<String>,
}
