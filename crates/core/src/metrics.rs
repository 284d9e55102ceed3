//! Raw host metric samples and the combined record that is broadcast and
//! persisted once per monitoring cycle.

use serde::{Deserialize, Serialize};

use crate::error::CollectError;
use crate::hardware::analyzer::AnalysisResult;

/// Aggregate CPU readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Utilisation across all cores since the previous sample (0-100).
    pub usage_percent: f64,
    /// Package / first core temperature; `0.0` when no sensor is readable.
    pub temperature_celsius: f64,
}

/// Readings for the first GPU visible on the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub name: String,
    pub usage_percent: f64,
    pub temperature_celsius: f64,
}

/// Cumulative scheduler counters since boot.
///
/// These are lifetime totals, not per-tick rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelCounters {
    pub context_switches: u64,
    pub interrupts: u64,
    /// Soft-interrupt / deferred procedure call total, used as a proxy for
    /// driver-level stalls.
    pub dpc_stalls: u64,
    pub process_count: u32,
}

/// One immutable reading of the host, produced fresh every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub cpu: CpuMetrics,
    /// `None` when the host has no GPU or the GPU could not be queried.
    pub gpu: Option<GpuMetrics>,
    pub kernel: KernelCounters,
}

/// The unit delivered to subscribers and stored as a history snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub metrics: MetricSample,
    pub analysis: AnalysisResult,
}

/// Anything able to take a reading of the host.
///
/// Implementations must report absent optional hardware through default or
/// `None` values; an `Err` is reserved for faults that make the whole
/// sample meaningless.
pub trait MetricSource: Send {
    fn sample(&mut self) -> Result<MetricSample, CollectError>;
}
