//! Handler for `GET /system/specs`.

use axum::Json;
use khm_core::host::HostInfo;

use crate::error::{AppError, AppResult};

/// GET /api/v1/system/specs
///
/// Static description of the monitored machine. Public.
pub async fn specs() -> AppResult<Json<HostInfo>> {
    let info = tokio::task::spawn_blocking(khm_collector::host::host_info)
        .await
        .map_err(|e| AppError::InternalError(format!("Host lookup task failed: {e}")))?;
    Ok(Json(info))
}
