pub mod auth;
pub mod history;
pub mod session;
pub mod system;
