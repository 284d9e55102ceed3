//! Repository for the `history` table (append-only time-series).

use khm_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::snapshot::{CreateSnapshot, Snapshot};

const COLUMNS: &str = "id, user_id, timestamp, metrics_json, status, created_at";

/// Provides query operations for health snapshots.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Insert a single snapshot.
    pub async fn insert(pool: &SqlitePool, input: &CreateSnapshot) -> Result<Snapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO history (user_id, timestamp, metrics_json, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Snapshot>(&query)
            .bind(input.user_id)
            .bind(input.timestamp)
            .bind(&input.metrics_json)
            .bind(&input.status)
            .bind(chrono::Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Most recent snapshots for a user, newest first.
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Snapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history \
             WHERE user_id = ?1 \
             ORDER BY timestamp DESC, id DESC \
             LIMIT ?2"
        );
        sqlx::query_as::<_, Snapshot>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Number of snapshots stored for a user.
    pub async fn count_for_user(pool: &SqlitePool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM history WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Delete snapshots sampled before `cutoff` (epoch seconds).
    ///
    /// Returns the number of rows deleted.
    pub async fn delete_older_than(pool: &SqlitePool, cutoff: f64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE timestamp < ?1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
