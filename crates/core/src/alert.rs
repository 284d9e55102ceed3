//! Severity levels and per-metric verdicts produced by the classifier.

use serde::{Deserialize, Serialize};

/// Severity of a single metric or of the whole host.
///
/// The derive order gives the total ordering `Safe < Warning < Threat`, so
/// the overall status of a result is simply the maximum of its entries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricStatus {
    /// Below the warning threshold.
    #[default]
    Safe,
    /// At or above the warning threshold but below critical.
    Warning,
    /// At or above the critical threshold.
    Threat,
}

impl MetricStatus {
    /// Wire / storage representation (`"SAFE"`, `"WARNING"`, `"THREAT"`).
    pub fn as_str(self) -> &'static str {
        match self {
            MetricStatus::Safe => "SAFE",
            MetricStatus::Warning => "WARNING",
            MetricStatus::Threat => "THREAT",
        }
    }
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one analysis entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricAlert {
    pub status: MetricStatus,
    pub message: String,
}

impl MetricAlert {
    pub fn new(status: MetricStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
