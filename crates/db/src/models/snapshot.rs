//! Health snapshot rows (append-only time-series in the `history` table).

use khm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A stored snapshot. `metrics_json` holds the serialized health record.
#[derive(Debug, Clone, FromRow)]
pub struct Snapshot {
    pub id: DbId,
    pub user_id: DbId,
    pub timestamp: f64,
    pub metrics_json: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a snapshot.
#[derive(Debug, Clone)]
pub struct CreateSnapshot {
    pub user_id: DbId,
    pub timestamp: f64,
    pub metrics_json: String,
    pub status: String,
}

/// A snapshot as returned by the history endpoint. `metrics_json` is
/// decoded back into a JSON object rather than sent as a string.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub timestamp: f64,
    pub metrics_json: serde_json::Value,
    pub status: String,
}

impl TryFrom<Snapshot> for SnapshotResponse {
    type Error = serde_json::Error;

    fn try_from(row: Snapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            timestamp: row.timestamp,
            metrics_json: serde_json::from_str(&row.metrics_json)?,
            status: row.status,
        })
    }
}
