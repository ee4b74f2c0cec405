//! Notification events, rendering and background delivery
//!
//! Request handlers never write notifications themselves: they enqueue a
//! [`NotificationEvent`] on the [`NotificationDispatcher`] and carry on. The
//! dispatcher worker resolves recipients, stores the rows and hands them to
//! the push sender.

pub mod dispatcher;
pub mod push;
pub mod service;
pub mod sink;

pub use dispatcher::{DispatchStats, DispatcherHandle, NotificationDispatcher};
pub use push::{LogPushSender, PushSender};
pub use service::NotificationService;
pub use sink::{DeliveryReport, NotificationSink, StoreSink};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::NotificationKind;

/// Something happened that some users should hear about
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    NewFollower {
        follower_id: Uuid,
        follower_username: String,
        followed_id: Uuid,
    },
    ModeratorInvite {
        invitee_id: Uuid,
        invited_by: String,
        subreddit_id: Uuid,
        subreddit_name: String,
    },
    Banned {
        user_id: Uuid,
        subreddit_id: Uuid,
        subreddit_name: String,
        reason: String,
        expires_at: Option<DateTime<Utc>>,
    },
    FollowedUserPost {
        author_id: Uuid,
        author_username: String,
        post_id: Uuid,
        post_title: String,
        subreddit_name: String,
    },
    CommentReply {
        recipient_id: Uuid,
        author_id: Uuid,
        author_username: String,
        comment_id: Uuid,
        post_title: String,
    },
}

/// Who receives an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipients {
    User(Uuid),
    FollowersOf(Uuid),
}

/// Stored form of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub title: String,
    pub body: String,
    pub object_id: Option<Uuid>,
    pub object_type: Option<&'static str>,
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::NewFollower { .. } => NotificationKind::NewFollower,
            NotificationEvent::ModeratorInvite { .. } => NotificationKind::ModeratorInvite,
            NotificationEvent::Banned { .. } => NotificationKind::Banned,
            NotificationEvent::FollowedUserPost { .. } => NotificationKind::FollowedUserPost,
            NotificationEvent::CommentReply { .. } => NotificationKind::CommentReply,
        }
    }

    pub fn recipients(&self) -> Recipients {
        match self {
            NotificationEvent::NewFollower { followed_id, .. } => Recipients::User(*followed_id),
            NotificationEvent::ModeratorInvite { invitee_id, .. } => Recipients::User(*invitee_id),
            NotificationEvent::Banned { user_id, .. } => Recipients::User(*user_id),
            NotificationEvent::FollowedUserPost { author_id, .. } => {
                Recipients::FollowersOf(*author_id)
            }
            NotificationEvent::CommentReply { recipient_id, .. } => {
                Recipients::User(*recipient_id)
            }
        }
    }

    /// User who caused the event; never notified about it
    pub fn actor_id(&self) -> Option<Uuid> {
        match self {
            NotificationEvent::NewFollower { follower_id, .. } => Some(*follower_id),
            NotificationEvent::FollowedUserPost { author_id, .. } => Some(*author_id),
            NotificationEvent::CommentReply { author_id, .. } => Some(*author_id),
            NotificationEvent::ModeratorInvite { .. } | NotificationEvent::Banned { .. } => None,
        }
    }

    pub fn render(&self) -> RenderedNotification {
        match self {
            NotificationEvent::NewFollower {
                follower_id,
                follower_username,
                ..
            } => RenderedNotification {
                title: format!("u/{} started following you", follower_username),
                body: String::new(),
                object_id: Some(*follower_id),
                object_type: Some("user"),
            },
            NotificationEvent::ModeratorInvite {
                invited_by,
                subreddit_id,
                subreddit_name,
                ..
            } => RenderedNotification {
                title: format!("You are invited to moderate r/{}", subreddit_name),
                body: format!("u/{} invited you to join the moderator team", invited_by),
                object_id: Some(*subreddit_id),
                object_type: Some("subreddit"),
            },
            NotificationEvent::Banned {
                subreddit_id,
                subreddit_name,
                reason,
                expires_at,
                ..
            } => {
                let duration = match expires_at {
                    Some(at) => format!("until {}", at.format("%Y-%m-%d %H:%M UTC")),
                    None => "permanently".to_string(),
                };
                RenderedNotification {
                    title: format!("You have been banned from r/{}", subreddit_name),
                    body: format!("Banned {}. Reason: {}", duration, reason),
                    object_id: Some(*subreddit_id),
                    object_type: Some("subreddit"),
                }
            }
            NotificationEvent::FollowedUserPost {
                author_username,
                post_id,
                post_title,
                subreddit_name,
                ..
            } => RenderedNotification {
                title: format!("u/{} posted in r/{}", author_username, subreddit_name),
                body: post_title.clone(),
                object_id: Some(*post_id),
                object_type: Some("post"),
            },
            NotificationEvent::CommentReply {
                author_username,
                comment_id,
                post_title,
                ..
            } => RenderedNotification {
                title: format!("u/{} replied to you", author_username),
                body: format!("on \"{}\"", post_title),
                object_id: Some(*comment_id),
                object_type: Some("comment"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_fan_out_targets_followers() {
        let author = Uuid::new_v4();
        let event = NotificationEvent::FollowedUserPost {
            author_id: author,
            author_username: "alice".into(),
            post_id: Uuid::new_v4(),
            post_title: "Hello".into(),
            subreddit_name: "rust".into(),
        };
        assert_eq!(event.recipients(), Recipients::FollowersOf(author));
        assert_eq!(event.actor_id(), Some(author));
        assert_eq!(event.kind(), NotificationKind::FollowedUserPost);

        let rendered = event.render();
        assert_eq!(rendered.title, "u/alice posted in r/rust");
        assert_eq!(rendered.body, "Hello");
        assert_eq!(rendered.object_type, Some("post"));
    }

    #[test]
    fn permanent_ban_rendering() {
        let event = NotificationEvent::Banned {
            user_id: Uuid::new_v4(),
            subreddit_id: Uuid::new_v4(),
            subreddit_name: "rust".into(),
            reason: "spam".into(),
            expires_at: None,
        };
        let rendered = event.render();
        assert_eq!(rendered.title, "You have been banned from r/rust");
        assert_eq!(rendered.body, "Banned permanently. Reason: spam");
        assert_eq!(event.actor_id(), None);
    }
}
