/// Community Service Library
///
/// Subreddit-style communities for the Nova social platform: user profiles
/// and follows, subreddits with moderator teams, flairs, posts, comments,
/// notifications and private messages. Every listing is paginated with the
/// shared `cursor-pagination` engine.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: route table
/// - `services`: business rules, permission checks and the notification dispatcher
/// - `db`: PostgreSQL repositories
/// - `models`: rows, views and request bodies
/// - `middleware` / `security`: bearer token authentication
/// - `error`: error types and handling
/// - `config`: configuration management
/// - `metrics`: Prometheus collectors
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
