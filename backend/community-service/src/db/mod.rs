/// Database access layer
///
/// Free functions over a `PgPool`, one module per aggregate. Listing queries
/// return the complete filtered candidate set in listing order; windowing
/// happens in the service layer.
pub mod comment_repo;
pub mod flair_repo;
pub mod message_repo;
pub mod moderation_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod subreddit_repo;
pub mod user_repo;
