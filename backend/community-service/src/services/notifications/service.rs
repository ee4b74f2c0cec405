//! Reading and managing the caller's notifications

use cursor_pagination::Paginator;
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::notification_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::NotificationListing;
use crate::services::listing::{Listing, ListingQuery};

pub struct NotificationService {
    pool: PgPool,
    paginator: Paginator,
}

impl NotificationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            paginator: state.paginator,
        }
    }

    /// Visible notifications, newest first, with the unread total
    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
        query: &ListingQuery,
    ) -> Result<NotificationListing> {
        let listing = Listing::new("notifications", query, &self.paginator)?;
        let notifications = notification_repo::list_visible(&self.pool, caller.user_id).await?;
        let page = listing.page(notifications)?;
        let unread_count = notification_repo::unread_count(&self.pool, caller.user_id).await?;

        Ok(NotificationListing { page, unread_count })
    }

    pub async fn mark_read(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if !notification_repo::mark_read(&self.pool, caller.user_id, id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, caller: &AuthenticatedUser) -> Result<u64> {
        Ok(notification_repo::mark_all_read(&self.pool, caller.user_id).await?)
    }

    pub async fn set_hidden(&self, caller: &AuthenticatedUser, id: Uuid, hidden: bool) -> Result<()> {
        if !notification_repo::set_hidden(&self.pool, caller.user_id, id, hidden).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("notification {} not found", id))
}
