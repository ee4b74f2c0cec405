/// HTTP handlers
///
/// Thin wrappers: extract, validate, call the service, serialise.
pub mod comments;
pub mod flairs;
pub mod health;
pub mod messages;
pub mod moderation;
pub mod notifications;
pub mod posts;
pub mod subreddits;
pub mod users;
