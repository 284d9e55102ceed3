//! Domain types and pure logic for the kernel health monitor.
//!
//! Nothing in this crate touches the OS, the network, or the database:
//! the collector, persistence and server crates build on these types.

pub mod alert;
pub mod error;
pub mod hardware;
pub mod host;
pub mod metric_names;
pub mod metrics;
pub mod types;
