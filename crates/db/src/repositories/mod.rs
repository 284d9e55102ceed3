//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&SqlitePool` as the first argument.

pub mod snapshot_repo;
pub mod user_repo;

pub use snapshot_repo::SnapshotRepo;
pub use user_repo::UserRepo;
