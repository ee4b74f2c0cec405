//! Push delivery of stored notifications

use async_trait::async_trait;

use crate::models::Notification;

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn push(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Default sender: records the delivery in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn push(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            kind = %notification.kind,
            "push notification delivered"
        );
        Ok(())
    }
}
