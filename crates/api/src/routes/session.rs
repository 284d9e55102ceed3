use axum::routing::{get, post};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/session`. All require a bearer token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::status))
        .route("/start", post(session::start))
        .route("/stop", post(session::stop))
}
