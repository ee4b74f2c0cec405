//! Background notification dispatcher
//!
//! A bounded queue feeds a single worker task. Enqueueing never waits: when
//! the queue is full or the worker is gone the event is dropped, logged and
//! counted. On shutdown the worker stops accepting events, drains what is
//! already queued and exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::{NotificationEvent, NotificationSink};
use crate::metrics;

/// Totals reported by the worker when it exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub events: u64,
    pub failed_events: u64,
    pub stored: u64,
    pub pushed: u64,
    pub push_failed: u64,
}

/// Cloneable enqueue side of the dispatcher
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<NotificationEvent>,
}

/// Join side of the dispatcher, owned by `main`
pub struct DispatcherHandle {
    join: JoinHandle<DispatchStats>,
}

impl NotificationDispatcher {
    /// Spawn the worker. It runs until `shutdown` fires or every
    /// dispatcher clone is dropped.
    pub fn spawn(
        sink: Arc<dyn NotificationSink>,
        capacity: usize,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, DispatcherHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let join = tokio::spawn(run_worker(sink, rx, shutdown));
        (Self { tx }, DispatcherHandle { join })
    }

    /// Queue an event without waiting. Returns false if it was dropped.
    pub fn enqueue(&self, event: NotificationEvent) -> bool {
        let kind = event.kind();
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(kind = kind.as_str(), "notification queue full, event dropped");
                metrics::record_dispatch(kind.as_str(), "dropped_full", 1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(
                    kind = kind.as_str(),
                    "notification dispatcher stopped, event dropped"
                );
                metrics::record_dispatch(kind.as_str(), "dropped_closed", 1);
                false
            }
        }
    }
}

impl DispatcherHandle {
    /// Wait for the worker to finish draining.
    pub async fn join(self) -> DispatchStats {
        match self.join.await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!(error = %e, "notification dispatcher task failed");
                DispatchStats::default()
            }
        }
    }

    /// Like [`join`](Self::join) but gives up after `timeout`.
    pub async fn join_timeout(self, timeout: Duration) -> Option<DispatchStats> {
        match tokio::time::timeout(timeout, self.join()).await {
            Ok(stats) => Some(stats),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "notification dispatcher did not drain within timeout"
                );
                None
            }
        }
    }
}

async fn run_worker(
    sink: Arc<dyn NotificationSink>,
    mut rx: mpsc::Receiver<NotificationEvent>,
    mut shutdown: broadcast::Receiver<()>,
) -> DispatchStats {
    tracing::info!("notification dispatcher started");
    let mut stats = DispatchStats::default();

    loop {
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Some(event) => process(sink.as_ref(), &event, &mut stats).await,
                None => break,
            },
            _ = shutdown.recv() => {
                rx.close();
                let mut drained = 0u64;
                while let Some(event) = rx.recv().await {
                    process(sink.as_ref(), &event, &mut stats).await;
                    drained += 1;
                }
                tracing::info!(drained, "notification queue drained on shutdown");
                break;
            }
        }
    }

    tracing::info!(
        events = stats.events,
        failed_events = stats.failed_events,
        stored = stats.stored,
        pushed = stats.pushed,
        push_failed = stats.push_failed,
        "notification dispatcher stopped"
    );
    stats
}

async fn process(sink: &dyn NotificationSink, event: &NotificationEvent, stats: &mut DispatchStats) {
    let kind = event.kind().as_str();
    stats.events += 1;

    match sink.deliver(event).await {
        Ok(report) => {
            stats.stored += report.stored;
            stats.pushed += report.pushed;
            stats.push_failed += report.push_failed;
            metrics::record_dispatch(kind, "stored", report.stored);
            metrics::record_dispatch(kind, "pushed", report.pushed);
            metrics::record_dispatch(kind, "push_failed", report.push_failed);
            tracing::debug!(
                kind,
                stored = report.stored,
                pushed = report.pushed,
                "notification event delivered"
            );
        }
        Err(e) => {
            stats.failed_events += 1;
            metrics::record_dispatch(kind, "store_failed", 1);
            tracing::error!(kind, error = %e, "notification event delivery failed");
        }
    }
}
