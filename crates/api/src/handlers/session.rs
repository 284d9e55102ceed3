//! Handlers for the `/session` resource.
//!
//! These only flip the caller's monitoring flag. The live feed keeps
//! running either way; the flag decides whether history is recorded.

use axum::extract::State;
use axum::Json;
use khm_core::types::DbId;
use serde::Serialize;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionChanged {
    pub message: &'static str,
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub user_id: DbId,
    pub active: bool,
}

/// POST /api/v1/session/start
pub async fn start(State(state): State<AppState>, user: AuthUser) -> Json<SessionChanged> {
    state.sessions.start(user.user_id).await;
    tracing::info!(user_id = user.user_id, "Monitoring session started");
    Json(SessionChanged {
        message: "Monitoring started",
        user_id: user.user_id,
    })
}

/// POST /api/v1/session/stop
pub async fn stop(State(state): State<AppState>, user: AuthUser) -> Json<SessionChanged> {
    state.sessions.stop(user.user_id).await;
    tracing::info!(user_id = user.user_id, "Monitoring session stopped");
    Json(SessionChanged {
        message: "Monitoring stopped",
        user_id: user.user_id,
    })
}

/// GET /api/v1/session
pub async fn status(State(state): State<AppState>, user: AuthUser) -> Json<SessionStatus> {
    Json(SessionStatus {
        user_id: user.user_id,
        active: state.sessions.is_active(user.user_id).await,
    })
}
