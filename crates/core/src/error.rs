/// Domain-level failures surfaced by the server's collaborators
/// (authentication, history lookup, input validation).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A fault while reading host metrics that cannot be papered over with a
/// default value. The broadcast loop treats it as a failed cycle.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Kernel counters unavailable: {0}")]
    KernelCounters(String),

    #[error("I/O error while collecting metrics: {0}")]
    Io(#[from] std::io::Error),
}
