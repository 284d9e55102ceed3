//! Background maintenance jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn` and stopped through a [`CancellationToken`].
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod snapshot_retention;
