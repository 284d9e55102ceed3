//! The host [`MetricSource`] used by the broadcast loop.
//!
//! [`MetricsCollector`] keeps the `sysinfo` handles alive between samples so
//! CPU usage is measured relative to the previous call. The very first
//! sample after construction therefore measures the (very short) interval
//! since the constructor ran and can read as `0.0`; that is expected.

use khm_core::error::CollectError;
use khm_core::metrics::{CpuMetrics, GpuMetrics, KernelCounters, MetricSample, MetricSource};
use khm_core::types::epoch_seconds_now;
use sysinfo::{
    Components, CpuRefreshKind, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System,
};

use crate::gpu::{GpuProbe, NvmlProbe};
use crate::kernel;

/// Sensor label fragments that identify the CPU package, most specific first.
const CPU_SENSOR_HINTS: &[&str] = &["package", "coretemp", "k10temp", "tctl", "cpu"];

/// Samples CPU, GPU and kernel metrics from the local host.
pub struct MetricsCollector {
    system: System,
    components: Components,
    gpu: Box<dyn GpuProbe>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Build a collector that reads the first NVIDIA GPU through NVML.
    pub fn new() -> Self {
        Self::with_gpu_probe(Box::new(NvmlProbe::new()))
    }

    /// Build a collector with a custom GPU source.
    pub fn with_gpu_probe(gpu: Box<dyn GpuProbe>) -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        // Establish the baseline for the first usage delta.
        system.refresh_cpu_usage();

        let components = Components::new_with_refreshed_list();
        tracing::debug!(sensors = components.list().len(), "Temperature sensors discovered");

        Self {
            system,
            components,
            gpu,
        }
    }

    fn cpu_usage(&mut self) -> f64 {
        self.system.refresh_cpu_usage();
        f64::from(self.system.global_cpu_usage())
    }

    fn cpu_temperature(&mut self) -> f64 {
        self.components.refresh(true);
        pick_cpu_temperature(
            self.components
                .list()
                .iter()
                .map(|c| (c.label(), c.temperature())),
        )
    }

    fn gpu_reading(&self) -> Option<GpuMetrics> {
        match self.gpu.query() {
            Ok(reading) => reading,
            Err(e) => {
                tracing::debug!(error = %e, "GPU query failed, reporting no GPU");
                None
            }
        }
    }

    fn process_count(&mut self) -> u32 {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        u32::try_from(self.system.processes().len()).unwrap_or(u32::MAX)
    }
}

impl MetricSource for MetricsCollector {
    fn sample(&mut self) -> Result<MetricSample, CollectError> {
        let usage_percent = self.cpu_usage();
        let temperature_celsius = self.cpu_temperature();
        let gpu = self.gpu_reading();
        let totals = kernel::read_kernel_totals()?;
        let process_count = self.process_count();

        Ok(MetricSample {
            timestamp: epoch_seconds_now(),
            cpu: CpuMetrics {
                usage_percent,
                temperature_celsius,
            },
            gpu,
            kernel: KernelCounters {
                context_switches: totals.context_switches,
                interrupts: totals.interrupts,
                dpc_stalls: totals.soft_interrupts,
                process_count,
            },
        })
    }
}

/// Choose the CPU temperature from a set of `(label, reading)` sensors.
///
/// Prefers sensors whose label names the CPU package, then any sensor with a
/// reading. Returns `0.0` when nothing is readable (missing permissions or
/// drivers are common and not an error).
pub fn pick_cpu_temperature<'a, I>(sensors: I) -> f64
where
    I: IntoIterator<Item = (&'a str, Option<f32>)>,
{
    let readable: Vec<(String, f32)> = sensors
        .into_iter()
        .filter_map(|(label, temp)| {
            temp.filter(|t| t.is_finite())
                .map(|t| (label.to_lowercase(), t))
        })
        .collect();

    CPU_SENSOR_HINTS
        .iter()
        .find_map(|hint| {
            readable
                .iter()
                .find(|(label, _)| label.contains(hint))
                .map(|(_, t)| *t)
        })
        .or_else(|| readable.first().map(|(_, t)| *t))
        .map(f64::from)
        .unwrap_or(0.0)
}
