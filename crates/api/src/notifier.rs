//! # Notification Dispatcher
//!
//! Background task that delivers queued notifications. Handlers only insert
//! notification rows; this dispatcher drains the undelivered ones on a fixed
//! interval and marks them dispatched.
//!
//! The task is tied to an explicit lifecycle: [`Dispatcher::spawn`] starts
//! it and [`Dispatcher::stop`] cancels it and waits for it to finish, so no
//! timer outlives the server that started it. Missed ticks are skipped
//! rather than bursted.

use std::time::Duration;

use eyre::Result;
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How many pending notifications to pick up per tick.
const DISPATCH_BATCH_SIZE: i64 = 100;

/// Handle to the running dispatcher task.
pub struct Dispatcher {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Dispatcher {
    /// Spawns the dispatcher loop on the current runtime.
    pub fn spawn(pool: PgPool, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!("Notification dispatcher started (interval: {:?})", interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match dispatch_pending(&pool).await {
                            Ok(0) => {}
                            Ok(count) => debug!("Dispatched {} notification(s)", count),
                            Err(e) => warn!("Notification dispatch failed: {}", e),
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("Notification dispatcher stopping");
                        break;
                    }
                }
            }
        });

        Self { shutdown, task }
    }

    /// Cancels the dispatcher and waits for the loop to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Delivers one batch of pending notifications.
///
/// Delivery here is emitting the notification to the log stream; a real
/// deployment would hand the batch to a push or email provider at this
/// point. Rows are marked dispatched only after delivery.
pub async fn dispatch_pending(pool: &PgPool) -> Result<usize> {
    let pending =
        kickoff_db::repositories::notification::list_pending(pool, DISPATCH_BATCH_SIZE).await?;

    if pending.is_empty() {
        return Ok(0);
    }

    let mut dispatched: Vec<Uuid> = Vec::with_capacity(pending.len());
    for notification in &pending {
        info!(
            "Delivering notification: id={}, user_id={}, kind={}",
            notification.id, notification.user_id, notification.kind
        );
        dispatched.push(notification.id);
    }

    kickoff_db::repositories::notification::mark_dispatched(pool, &dispatched).await?;

    Ok(dispatched.len())
}
