use chrono::{DateTime, Utc};
use cursor_pagination::Paginable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub subreddit_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub flair_id: Option<Uuid>,
    pub nsfw: bool,
    pub spoiler: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Post joined with its author, subreddit and flair
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostView {
    pub id: Uuid,
    pub subreddit_id: Uuid,
    pub subreddit_name: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub title: String,
    pub body: String,
    pub flair_id: Option<Uuid>,
    pub flair_text: Option<String>,
    pub nsfw: bool,
    pub spoiler: bool,
    pub locked: bool,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Paginable for PostView {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 40000))]
    pub body: Option<String>,
    pub flair_id: Option<Uuid>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub spoiler: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub parent_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Paginable for CommentView {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
    pub parent_id: Option<Uuid>,
}
