//! Handler for `GET /history`.

use axum::extract::{Query, State};
use axum::Json;
use khm_core::error::CoreError;
use khm_db::models::snapshot::SnapshotResponse;
use khm_db::repositories::SnapshotRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Hard cap on `?limit=`.
pub const MAX_HISTORY_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Number of snapshots to return (default from config, max 500).
    pub limit: Option<i64>,
}

/// GET /api/v1/history
///
/// The caller's most recent snapshots, newest first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<SnapshotResponse>>> {
    let limit = query
        .limit
        .unwrap_or(state.config.monitor.history_limit)
        .clamp(1, MAX_HISTORY_LIMIT);

    let rows = SnapshotRepo::list_for_user(&state.pool, user.user_id, limit).await?;
    if rows.is_empty() {
        return Err(AppError::Core(CoreError::NotFound(
            "No history found for this user.".into(),
        )));
    }

    let snapshots = rows
        .into_iter()
        .map(SnapshotResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InternalError(format!("Corrupt history snapshot: {e}")))?;

    Ok(Json(snapshots))
}
