//! Writes history snapshots from the live feed.
//!
//! The recorder subscribes to the registry like any client. It keeps at
//! most one record per `min_interval` and stores it once for every user
//! whose session flag is on. Storage failures are logged and never reach
//! the broadcast loop.

use std::sync::Arc;
use std::time::Duration;

use khm_core::metrics::HealthRecord;
use khm_db::models::snapshot::CreateSnapshot;
use khm_db::repositories::SnapshotRepo;
use khm_db::DbPool;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::registry::SubscriberRegistry;
use super::subscriber::ChannelSubscriber;
use crate::sessions::SessionFlags;

/// Registry id used by the recorder's channel subscriber.
pub const RECORDER_SUBSCRIBER_ID: &str = "snapshot-recorder";

pub struct SnapshotRecorder {
    pool: DbPool,
    sessions: SessionFlags,
    min_interval: Duration,
    last_saved: Option<Instant>,
}

impl SnapshotRecorder {
    pub fn new(pool: DbPool, sessions: SessionFlags, min_interval: Duration) -> Self {
        Self {
            pool,
            sessions,
            min_interval,
            last_saved: None,
        }
    }

    /// Store `record` for every active user. Returns the number of rows written.
    pub async fn save_for_active_users(&self, record: &HealthRecord) -> usize {
        let users = self.sessions.active_users().await;
        if users.is_empty() {
            return 0;
        }

        let metrics_json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize health record for history");
                return 0;
            }
        };
        let status = record.analysis.overall_status.as_str().to_string();

        let mut saved = 0;
        for user_id in users {
            let input = CreateSnapshot {
                user_id,
                timestamp: record.metrics.timestamp,
                metrics_json: metrics_json.clone(),
                status: status.clone(),
            };
            match SnapshotRepo::insert(&self.pool, &input).await {
                Ok(_) => saved += 1,
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Failed to store history snapshot");
                }
            }
        }
        saved
    }

    /// Handle one record from the feed, storing it if the throttle allows.
    pub async fn on_record(&mut self, record: &HealthRecord) -> usize {
        let due = self
            .last_saved
            .map_or(true, |at| at.elapsed() >= self.min_interval);
        if !due {
            return 0;
        }
        self.last_saved = Some(Instant::now());
        self.save_for_active_users(record).await
    }

    /// Subscribe to `registry` and record until `cancel` fires.
    ///
    /// If the registry drops the recorder (its queue filled up while the
    /// database was slow) it subscribes again with a fresh queue.
    pub async fn run(
        mut self,
        registry: Arc<SubscriberRegistry>,
        buffer: usize,
        cancel: CancellationToken,
    ) {
        tracing::info!(
            interval_secs = self.min_interval.as_secs(),
            "Snapshot recorder started"
        );

        let mut rx = subscribe(&registry, buffer).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    registry.unregister(RECORDER_SUBSCRIBER_ID).await;
                    tracing::info!("Snapshot recorder stopping");
                    break;
                }
                received = rx.recv() => match received {
                    Some(record) => {
                        let saved = self.on_record(&record).await;
                        if saved > 0 {
                            tracing::debug!(saved, "History snapshots stored");
                        }
                    }
                    None => {
                        tracing::warn!("Snapshot recorder was dropped by the registry, resubscribing");
                        rx = subscribe(&registry, buffer).await;
                    }
                },
            }
        }
    }
}

async fn subscribe(
    registry: &SubscriberRegistry,
    buffer: usize,
) -> mpsc::Receiver<Arc<HealthRecord>> {
    let (subscriber, rx) = ChannelSubscriber::channel(RECORDER_SUBSCRIBER_ID, buffer);
    registry.register(Box::new(subscriber)).await;
    rx
}
