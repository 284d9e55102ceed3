//! Kernel health monitor API server library.
//!
//! Exposes the building blocks (config, state, error handling, broadcast
//! pipeline, routes, WebSocket transport) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod background;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod ws;
