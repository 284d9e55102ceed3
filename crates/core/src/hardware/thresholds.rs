//! Fixed severity thresholds and the generic per-metric evaluator.

use crate::alert::{MetricAlert, MetricStatus};

/// Warning / critical pair for a continuous metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub warning_value: f64,
    pub critical_value: f64,
}

/// CPU and GPU temperature, in degrees Celsius.
pub const TEMPERATURE: Threshold = Threshold {
    warning_value: 80.0,
    critical_value: 90.0,
};

/// CPU and GPU utilisation, in percent.
pub const LOAD: Threshold = Threshold {
    warning_value: 80.0,
    critical_value: 95.0,
};

/// Cumulative DPC / soft-interrupt count at which the host is flagged as a
/// threat. There is no warning level.
pub const DPC_CRITICAL: u64 = 500_000;

/// Cumulative context switch count at which the host is flagged with a
/// warning. Only consulted when the DPC check did not fire.
pub const CONTEXT_SWITCH_CRITICAL: u64 = 1_000_000;

/// Classify a single value against a threshold.
///
/// Both bounds are inclusive: `value == critical_value` is a threat and
/// `value == warning_value` is a warning. A NaN compares false against both
/// bounds and is therefore reported as normal.
pub fn analyze_metric(name: &str, value: f64, threshold: &Threshold) -> MetricAlert {
    if value >= threshold.critical_value {
        MetricAlert::new(MetricStatus::Threat, format!("{name} critical: {value}"))
    } else if value >= threshold.warning_value {
        MetricAlert::new(MetricStatus::Warning, format!("{name} elevated"))
    } else {
        MetricAlert::new(MetricStatus::Safe, format!("{name} normal"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
