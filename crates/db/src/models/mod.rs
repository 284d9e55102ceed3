//! Row structs and insert DTOs.

pub mod snapshot;
pub mod user;
