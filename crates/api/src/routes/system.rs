use axum::routing::get;
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// Routes mounted at `/system`.
pub fn router() -> Router<AppState> {
    Router::new().route("/specs", get(system::specs))
}
