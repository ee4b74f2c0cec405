/// Data models for community-service
///
/// Row types map one-to-one onto the tables in `migrations/`; view types are
/// the joined shapes returned by listings and carry a cursor id.
pub mod content;
pub mod flair;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod subreddit;
pub mod user;

pub use content::{
    Comment, CommentView, CreateCommentRequest, CreatePostRequest, Post, PostView,
};
pub use flair::{CreateFlairRequest, Flair, ReorderFlairsRequest, UpdateFlairRequest};
pub use message::{MessageView, SendMessageRequest};
pub use moderation::{
    ApprovedEntry, BanRequest, BannedEntry, InviteModeratorRequest, ModeratorEntry,
    ModeratorRecord, ModeratorStatus, MuteRequest, MutedEntry, Permission,
    SetPermissionsRequest, UsernameRequest,
};
pub use notification::{Notification, NotificationKind, NotificationListing};
pub use subreddit::{
    CreateSubredditRequest, Subreddit, SubredditKind, SubredditResponse, UpdateSubredditRequest,
};
pub use user::{PublicProfile, UpdateProfileRequest, User};
