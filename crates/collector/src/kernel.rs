//! Cumulative scheduler counters.
//!
//! On Linux the totals come from `/proc/stat` (`ctxt`, `intr`, `softirq`).
//! Other platforms have no equivalent cheap source and report zeros.

use khm_core::error::CollectError;

/// Lifetime totals since boot, as exposed by the kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelTotals {
    pub context_switches: u64,
    pub interrupts: u64,
    pub soft_interrupts: u64,
}

#[cfg(target_os = "linux")]
const PROC_STAT: &str = "/proc/stat";

/// Read the current totals from the OS.
#[cfg(target_os = "linux")]
pub fn read_kernel_totals() -> Result<KernelTotals, CollectError> {
    let text = std::fs::read_to_string(PROC_STAT)?;
    parse_proc_stat(&text)
}

#[cfg(not(target_os = "linux"))]
pub fn read_kernel_totals() -> Result<KernelTotals, CollectError> {
    Ok(KernelTotals::default())
}

/// Parse the counter lines of a `/proc/stat` dump.
///
/// `intr` and `softirq` lines start with the grand total followed by
/// per-source counts; only the total is used. A missing `ctxt` line means
/// the file is not what we expect and is reported as an error.
pub fn parse_proc_stat(text: &str) -> Result<KernelTotals, CollectError> {
    let mut totals = KernelTotals::default();
    let mut saw_ctxt = false;

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let Some(tag) = fields.next() else {
            continue;
        };
        let target = match tag {
            "ctxt" => {
                saw_ctxt = true;
                &mut totals.context_switches
            }
            "intr" => &mut totals.interrupts,
            "softirq" => &mut totals.soft_interrupts,
            _ => continue,
        };
        let raw = fields
            .next()
            .ok_or_else(|| CollectError::KernelCounters(format!("`{tag}` line has no value")))?;
        *target = raw.parse().map_err(|_| {
            CollectError::KernelCounters(format!("`{tag}` value is not a number: {raw}"))
        })?;
    }

    if !saw_ctxt {
        return Err(CollectError::KernelCounters(
            "no `ctxt` line in /proc/stat".to_string(),
        ));
    }
    Ok(totals)
}
