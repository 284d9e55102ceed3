//! Periodic purge of old history snapshots.

use std::time::Duration;

use khm_core::types::epoch_seconds_now;
use khm_db::repositories::SnapshotRepo;
use khm_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Delete snapshots older than `retention_hours`, hourly, until `cancel`
/// fires. The first purge runs immediately.
pub async fn run(pool: DbPool, retention_hours: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_hours,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Snapshot retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Snapshot retention job stopping");
                break;
            }
            _ = interval.tick() => {
                purge_once(&pool, retention_hours).await;
            }
        }
    }
}

/// Run a single purge pass. Returns the number of rows deleted (0 on error).
pub async fn purge_once(pool: &DbPool, retention_hours: i64) -> u64 {
    let cutoff = retention_cutoff(epoch_seconds_now(), retention_hours);
    match SnapshotRepo::delete_older_than(pool, cutoff).await {
        Ok(deleted) => {
            if deleted > 0 {
                tracing::info!(deleted, "Snapshot retention: purged old rows");
            } else {
                tracing::debug!("Snapshot retention: no rows to purge");
            }
            deleted
        }
        Err(e) => {
            tracing::error!(error = %e, "Snapshot retention: cleanup failed");
            0
        }
    }
}

/// Epoch-seconds cutoff `retention_hours` before `now`.
fn retention_cutoff(now: f64, retention_hours: i64) -> f64 {
    now - (retention_hours as f64) * 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_hours_before_now() {
        assert_eq!(retention_cutoff(100_000.0, 1), 96_400.0);
        assert_eq!(retention_cutoff(100_000.0, 0), 100_000.0);
    }
}
