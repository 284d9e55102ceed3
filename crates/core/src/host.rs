//! Static hardware descriptor returned by the specs endpoint.

use serde::{Deserialize, Serialize};

/// Fallback used when the firmware tables cannot be read.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";
/// Fallback used when the firmware tables cannot be read.
pub const GENERIC_MODEL: &str = "Generic PC";
/// `ram_total` when the OS reports no memory figure.
pub const UNKNOWN_RAM: &str = "Unknown";

/// One-time description of the machine the monitor runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Network host name.
    pub node: String,
    /// Operating system name and version.
    pub os: String,
    pub manufacturer: String,
    pub model: String,
    /// CPU brand string.
    pub processor: String,
    /// Total physical memory, e.g. `"15.54 GB"`, or `"Unknown"`.
    pub ram_total: String,
}

/// Format a byte count as gibibytes with two decimals (`"15.54 GB"`).
pub fn format_ram_total(bytes: u64) -> String {
    if bytes == 0 {
        return UNKNOWN_RAM.to_string();
    }
    let gib = bytes as f64 / (1024.0 * 1024.0 * 1024.0);
    format!("{gib:.2} GB")
}
