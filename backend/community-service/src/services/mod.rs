/// Business logic layer for community-service
///
/// Services are cheap to build from [`AppState`](crate::app_state::AppState)
/// and are created per request by the handlers.
pub mod comments;
pub mod flairs;
pub mod listing;
pub mod messages;
pub mod moderation;
pub mod notifications;
pub mod permissions;
pub mod posts;
pub mod subreddits;
pub mod users;

pub use comments::CommentService;
pub use flairs::FlairService;
pub use listing::{Listing, ListingQuery};
pub use messages::MessageService;
pub use moderation::ModerationService;
pub use notifications::{NotificationDispatcher, NotificationEvent, NotificationService};
pub use posts::PostService;
pub use subreddits::{SubredditContext, SubredditService};
pub use users::UserService;
