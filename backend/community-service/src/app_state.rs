//! Application state shared by all handlers

use cursor_pagination::Paginator;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::security::JwtValidator;
use crate::services::NotificationDispatcher;

/// Everything a handler needs, built once in `main`
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub paginator: Paginator,
    pub notifier: NotificationDispatcher,
    pub jwt: Arc<JwtValidator>,
}

impl AppState {
    pub fn new(db: PgPool, config: Arc<Config>, notifier: NotificationDispatcher) -> Self {
        let paginator = Paginator::new(config.pagination.limits());
        let jwt = Arc::new(JwtValidator::new(&config.auth));
        Self {
            db,
            config,
            paginator,
            notifier,
            jwt,
        }
    }
}
