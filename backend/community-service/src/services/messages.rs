/// Message service - private messages between users
use cursor_pagination::{Page, Paginator};
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::message_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{MessageView, SendMessageRequest};
use crate::services::listing::{Listing, ListingQuery};
use crate::services::users::{ensure_caller, require_user_by_name};

pub struct MessageService {
    pool: PgPool,
    paginator: Paginator,
}

impl MessageService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            paginator: state.paginator,
        }
    }

    async fn load(&self, message_id: Uuid) -> Result<MessageView> {
        message_repo::find_message(&self.pool, message_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("message {} not found", message_id)))
    }

    pub async fn send(&self, caller: &AuthenticatedUser, req: &SendMessageRequest) -> Result<MessageView> {
        let sender = ensure_caller(&self.pool, caller).await?;
        let recipient = require_user_by_name(&self.pool, &req.to).await?;
        if recipient.id == sender.id {
            return Err(AppError::BadRequest("cannot message yourself".into()));
        }

        let id =
            message_repo::insert_message(&self.pool, sender.id, recipient.id, &req.subject, &req.body)
                .await?;
        tracing::info!(message_id = %id, sender_id = %sender.id, recipient_id = %recipient.id, "message sent");
        self.load(id).await
    }

    pub async fn inbox(
        &self,
        caller: &AuthenticatedUser,
        query: &ListingQuery,
    ) -> Result<Page<MessageView, Uuid>> {
        let listing = Listing::new("message_inbox", query, &self.paginator)?;
        let messages = message_repo::list_inbox(&self.pool, caller.user_id).await?;
        listing.page(messages)
    }

    pub async fn sent(
        &self,
        caller: &AuthenticatedUser,
        query: &ListingQuery,
    ) -> Result<Page<MessageView, Uuid>> {
        let listing = Listing::new("message_sent", query, &self.paginator)?;
        let messages = message_repo::list_sent(&self.pool, caller.user_id).await?;
        listing.page(messages)
    }

    pub async fn mark_read(&self, caller: &AuthenticatedUser, message_id: Uuid) -> Result<MessageView> {
        let message = self.load(message_id).await?;
        if message.recipient_id != caller.user_id {
            return Err(AppError::NotFound(format!("message {} not found", message_id)));
        }
        message_repo::mark_read(&self.pool, message_id).await?;
        self.load(message_id).await
    }
}
