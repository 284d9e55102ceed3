//! WebSocket transport for the live metrics feed.
//!
//! Provides the HTTP upgrade handler, the per-connection [`WsSubscriber`]
//! that forwards each tick's shared text frame.

mod handler;
pub mod subscriber;

pub use handler::ws_handler;
pub use subscriber::WsSubscriber;
