//! Where dispatched events end up

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::{NotificationEvent, PushSender, Recipients};
use crate::db::{notification_repo, user_repo};
use crate::error::Result;

/// Outcome of delivering one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub stored: u64,
    pub pushed: u64,
    pub push_failed: u64,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &NotificationEvent) -> Result<DeliveryReport>;
}

/// Persists notifications and hands them to the push sender
pub struct StoreSink {
    pool: PgPool,
    push: Option<Arc<dyn PushSender>>,
}

impl StoreSink {
    pub fn new(pool: PgPool, push: Option<Arc<dyn PushSender>>) -> Self {
        Self { pool, push }
    }
}

#[async_trait]
impl NotificationSink for StoreSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<DeliveryReport> {
        let mut recipients = match event.recipients() {
            Recipients::User(id) => vec![id],
            Recipients::FollowersOf(id) => user_repo::follower_ids(&self.pool, id).await?,
        };
        if let Some(actor) = event.actor_id() {
            recipients.retain(|id| *id != actor);
        }
        recipients.sort_unstable();
        recipients.dedup();

        if recipients.is_empty() {
            return Ok(DeliveryReport::default());
        }

        let rendered = event.render();
        let kind = event.kind();
        let stored = notification_repo::insert_for_recipients(
            &self.pool,
            &recipients,
            &notification_repo::NewNotification {
                kind: kind.as_str(),
                title: &rendered.title,
                body: &rendered.body,
                object_id: rendered.object_id,
                object_type: rendered.object_type,
            },
        )
        .await?;

        let mut report = DeliveryReport {
            stored: stored.len() as u64,
            ..DeliveryReport::default()
        };

        if let Some(push) = &self.push {
            for notification in &stored {
                match push.push(notification).await {
                    Ok(()) => report.pushed += 1,
                    Err(e) => {
                        report.push_failed += 1;
                        tracing::warn!(
                            notification_id = %notification.id,
                            error = %e,
                            "push delivery failed"
                        );
                    }
                }
            }
        }

        Ok(report)
    }
}
