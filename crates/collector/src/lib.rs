//! `khm-collector` -- host metric sampling.
//!
//! Reads CPU load and temperature through `sysinfo`, the first NVIDIA GPU
//! through NVML, and the cumulative scheduler counters from the kernel.
//! Also answers the one-off hardware description query.

pub mod collector;
pub mod gpu;
pub mod host;
pub mod kernel;

pub use collector::MetricsCollector;
