pub mod auth;
pub mod health;
pub mod history;
pub mod session;
pub mod system;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                 live metrics feed (WebSocket, public)
///
/// /auth/register      create account (public)
/// /auth/login         issue access token (public)
///
/// /session            current flag (auth)
/// /session/start      enable history recording (auth)
/// /session/stop       disable history recording (auth)
///
/// /history            recent snapshots (auth)
///
/// /system/specs       static host description (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/session", session::router())
        .nest("/history", history::router())
        .nest("/system", system::router())
}
