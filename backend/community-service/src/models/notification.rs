use chrono::{DateTime, Utc};
use cursor_pagination::{Page, Paginable};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Notification kind enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone followed the recipient
    NewFollower,
    /// The recipient was invited to moderate a subreddit
    ModeratorInvite,
    /// The recipient was banned from a subreddit
    Banned,
    /// A followed user submitted a post
    FollowedUserPost,
    /// Someone replied to the recipient's post or comment
    CommentReply,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewFollower => "new_follower",
            NotificationKind::ModeratorInvite => "moderator_invite",
            NotificationKind::Banned => "banned",
            NotificationKind::FollowedUserPost => "followed_user_post",
            NotificationKind::CommentReply => "comment_reply",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_follower" => Ok(NotificationKind::NewFollower),
            "moderator_invite" => Ok(NotificationKind::ModeratorInvite),
            "banned" => Ok(NotificationKind::Banned),
            "followed_user_post" => Ok(NotificationKind::FollowedUserPost),
            "comment_reply" => Ok(NotificationKind::CommentReply),
            other => Err(format!("unknown notification kind '{}'", other)),
        }
    }
}

/// Row of `notifications`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub object_id: Option<Uuid>,
    pub object_type: Option<String>,
    pub is_read: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Paginable for Notification {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.id
    }
}

/// Notification page plus the caller's unread total
#[derive(Debug, Clone, Serialize)]
pub struct NotificationListing {
    #[serde(flatten)]
    pub page: Page<Notification, Uuid>,
    pub unread_count: i64,
}
