//! Well-known analysis entry keys and WebSocket message types.
//!
//! These keys appear verbatim in the `details` map of every broadcast
//! [`AnalysisResult`](crate::hardware::analyzer::AnalysisResult) and in the
//! persisted history rows, so clients can rely on them.

/// WebSocket message type discriminator for live health records.
pub const MSG_TYPE_METRICS_UPDATE: &str = "metrics_update";

/// CPU package temperature entry.
pub const KEY_CPU_TEMP: &str = "cpu_temp";

/// Aggregate CPU utilisation entry.
pub const KEY_CPU_USAGE: &str = "cpu_usage";

/// GPU core temperature entry (only present when a GPU was sampled).
pub const KEY_GPU_TEMP: &str = "gpu_temp";

/// GPU utilisation entry (only present when a GPU was sampled).
pub const KEY_GPU_USAGE: &str = "gpu_usage";

/// Emitted when the DPC / soft-interrupt count reaches the critical level.
pub const KEY_KERNEL_STALLS: &str = "kernel_stalls";

/// Emitted when context switches reach the critical level (and stalls did not).
pub const KEY_KERNEL_CTX: &str = "kernel_ctx";

/// Emitted when neither kernel check fired.
pub const KEY_KERNEL_STATUS: &str = "kernel_status";

/// Human-readable metric names used when building status messages.
pub const NAME_CPU_TEMP: &str = "CPU temperature";
pub const NAME_CPU_USAGE: &str = "CPU usage";
pub const NAME_GPU_TEMP: &str = "GPU temperature";
pub const NAME_GPU_USAGE: &str = "GPU usage";
