//! Account credentials and bearer tokens.
//!
//! - [`password`] -- Argon2id hashing and credential rules.
//! - [`jwt`] -- HS256 access-token issue and validation.

pub mod jwt;
pub mod password;
