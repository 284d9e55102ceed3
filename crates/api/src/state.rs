use std::sync::Arc;

use crate::broadcast::SubscriberRegistry;
use crate::config::ServerConfig;
use crate::sessions::SessionFlags;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is an `Arc` or a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: khm_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Live delivery targets of the broadcast loop.
    pub registry: Arc<SubscriberRegistry>,
    /// Per-user monitoring switches.
    pub sessions: SessionFlags,
}
