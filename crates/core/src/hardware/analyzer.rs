//! Health classifier: raw sample in, per-metric verdicts plus an overall
//! severity out.
//!
//! CPU and GPU metrics are evaluated independently, one entry each. Kernel
//! counters go through a short-circuit chain that yields exactly one entry
//! per cycle (`kernel_stalls`, else `kernel_ctx`, else `kernel_status`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alert::{MetricAlert, MetricStatus};
use crate::hardware::thresholds::{
    analyze_metric, CONTEXT_SWITCH_CRITICAL, DPC_CRITICAL, LOAD, TEMPERATURE,
};
use crate::metric_names::{
    KEY_CPU_TEMP, KEY_CPU_USAGE, KEY_GPU_TEMP, KEY_GPU_USAGE, KEY_KERNEL_CTX, KEY_KERNEL_STALLS,
    KEY_KERNEL_STATUS, NAME_CPU_TEMP, NAME_CPU_USAGE, NAME_GPU_TEMP, NAME_GPU_USAGE,
};
use crate::metrics::{KernelCounters, MetricSample};

/// Classification of one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Maximum severity across `details`; `SAFE` when `details` is empty.
    pub overall_status: MetricStatus,
    /// Verdict per entry key (see [`crate::metric_names`]).
    pub details: BTreeMap<String, MetricAlert>,
}

impl AnalysisResult {
    /// Build a result from its entries, deriving the overall status.
    pub fn from_details(details: BTreeMap<String, MetricAlert>) -> Self {
        let overall_status = details
            .values()
            .map(|alert| alert.status)
            .max()
            .unwrap_or_default();
        Self {
            overall_status,
            details,
        }
    }

    /// Status of a single entry, if present.
    pub fn status_of(&self, key: &str) -> Option<MetricStatus> {
        self.details.get(key).map(|alert| alert.status)
    }
}

/// Evaluate a sample against the fixed threshold table.
pub fn evaluate(sample: &MetricSample) -> AnalysisResult {
    let mut details = BTreeMap::new();

    details.insert(
        KEY_CPU_TEMP.to_string(),
        analyze_metric(NAME_CPU_TEMP, sample.cpu.temperature_celsius, &TEMPERATURE),
    );
    details.insert(
        KEY_CPU_USAGE.to_string(),
        analyze_metric(NAME_CPU_USAGE, sample.cpu.usage_percent, &LOAD),
    );

    if let Some(gpu) = &sample.gpu {
        details.insert(
            KEY_GPU_TEMP.to_string(),
            analyze_metric(NAME_GPU_TEMP, gpu.temperature_celsius, &TEMPERATURE),
        );
        details.insert(
            KEY_GPU_USAGE.to_string(),
            analyze_metric(NAME_GPU_USAGE, gpu.usage_percent, &LOAD),
        );
    }

    let (key, alert) = analyze_kernel(&sample.kernel);
    details.insert(key.to_string(), alert);

    AnalysisResult::from_details(details)
}

/// Kernel chain: stalls win over context switches, which win over nominal.
fn analyze_kernel(kernel: &KernelCounters) -> (&'static str, MetricAlert) {
    if kernel.dpc_stalls >= DPC_CRITICAL {
        (
            KEY_KERNEL_STALLS,
            MetricAlert::new(
                MetricStatus::Threat,
                format!("DPC/stall count critical: {}", kernel.dpc_stalls),
            ),
        )
    } else if kernel.context_switches >= CONTEXT_SWITCH_CRITICAL {
        (
            KEY_KERNEL_CTX,
            MetricAlert::new(
                MetricStatus::Warning,
                format!("Context switches elevated: {}", kernel.context_switches),
            ),
        )
    } else {
        (
            KEY_KERNEL_STATUS,
            MetricAlert::new(MetricStatus::Safe, "Kernel metrics normal"),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CpuMetrics, GpuMetrics};

    fn make_sample(cpu_temp: f64, cpu_usage: f64, dpcs: u64, ctx: u64) -> MetricSample {
        MetricSample {
            timestamp: 1_700_000_000.0,
            cpu: CpuMetrics {
                usage_percent: cpu_usage,
                temperature_celsius: cpu_temp,
            },
            gpu: None,
            kernel: KernelCounters {
                context_switches: ctx,
                interrupts: 0,
                dpc_stalls: dpcs,
                process_count: 100,
            },
        }
    }

    fn kernel_keys(result: &AnalysisResult) -> Vec<&str> {
        result
            .details
            .keys()
            .map(String::as_str)
            .filter(|k| k.starts_with("kernel_"))
            .collect()
    }

    #[test]
    fn absent_gpu_produces_no_gpu_entries() {
        let result = evaluate(&make_sample(40.0, 10.0, 0, 0));
        assert!(!result.details.contains_key(KEY_GPU_TEMP));
        assert!(!result.details.contains_key(KEY_GPU_USAGE));
    }

    #[test]
    fn present_gpu_is_evaluated() {
        let mut sample = make_sample(40.0, 10.0, 0, 0);
        sample.gpu = Some(GpuMetrics {
            name: "Test GPU".to_string(),
            usage_percent: 85.0,
            temperature_celsius: 91.0,
        });

        let result = evaluate(&sample);

        assert_eq!(result.status_of(KEY_GPU_USAGE), Some(MetricStatus::Warning));
        assert_eq!(result.status_of(KEY_GPU_TEMP), Some(MetricStatus::Threat));
        assert_eq!(result.overall_status, MetricStatus::Threat);
    }

    #[test]
    fn dpc_at_critical_short_circuits_context_switch_check() {
        let result = evaluate(&make_sample(40.0, 10.0, 500_000, 5_000_000));
        assert_eq!(kernel_keys(&result), vec![KEY_KERNEL_STALLS]);
        assert_eq!(
            result.status_of(KEY_KERNEL_STALLS),
            Some(MetricStatus::Threat)
        );
    }

    #[test]
    fn context_switches_at_critical_emit_warning() {
        let result = evaluate(&make_sample(40.0, 10.0, 0, 1_000_000));
        assert_eq!(kernel_keys(&result), vec![KEY_KERNEL_CTX]);
        assert_eq!(result.status_of(KEY_KERNEL_CTX), Some(MetricStatus::Warning));
        assert_eq!(result.overall_status, MetricStatus::Warning);
    }

    #[test]
    fn quiet_kernel_emits_single_safe_entry() {
        let result = evaluate(&make_sample(40.0, 10.0, 0, 0));
        assert_eq!(kernel_keys(&result), vec![KEY_KERNEL_STATUS]);
        assert_eq!(
            result.status_of(KEY_KERNEL_STATUS),
            Some(MetricStatus::Safe)
        );
    }

    #[test]
    fn hot_cpu_without_gpu_is_a_threat() {
        let result = evaluate(&make_sample(95.0, 50.0, 0, 0));

        assert_eq!(result.overall_status, MetricStatus::Threat);
        assert_eq!(result.details.len(), 3);
        assert_eq!(result.status_of(KEY_CPU_TEMP), Some(MetricStatus::Threat));
        assert_eq!(result.status_of(KEY_CPU_USAGE), Some(MetricStatus::Safe));
        assert_eq!(
            result.status_of(KEY_KERNEL_STATUS),
            Some(MetricStatus::Safe)
        );
    }

    #[test]
    fn overall_is_max_of_entries() {
        let mut details = BTreeMap::new();
        details.insert("a".to_string(), MetricAlert::new(MetricStatus::Safe, "ok"));
        details.insert(
            "b".to_string(),
            MetricAlert::new(MetricStatus::Warning, "hmm"),
        );
        assert_eq!(
            AnalysisResult::from_details(details).overall_status,
            MetricStatus::Warning
        );
    }

    #[test]
    fn empty_details_are_safe() {
        let result = AnalysisResult::from_details(BTreeMap::new());
        assert_eq!(result.overall_status, MetricStatus::Safe);
    }

    #[test]
    fn result_serializes_overall_and_details() {
        let result = evaluate(&make_sample(95.0, 50.0, 0, 0));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["overall_status"], "THREAT");
        assert_eq!(json["details"]["cpu_temp"]["status"], "THREAT");
        assert_eq!(json["details"]["cpu_temp"]["message"], "CPU temperature critical: 95");
        assert_eq!(json["details"]["kernel_status"]["status"], "SAFE");
    }
}
