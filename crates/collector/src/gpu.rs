//! NVML-based GPU readings.
//!
//! NVML initialisation is **gracefully optional** -- if the host has no
//! NVIDIA drivers the probe logs a warning once and every query reports no
//! GPU instead of failing.

use khm_core::metrics::GpuMetrics;
use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::Nvml;

/// A GPU query that failed after the device was detected.
#[derive(Debug, thiserror::Error)]
#[error("GPU query failed: {0}")]
pub struct GpuQueryError(pub String);

/// Source of GPU readings. Only the first device is reported.
pub trait GpuProbe: Send {
    /// `Ok(None)` when the host has no GPU.
    fn query(&self) -> Result<Option<GpuMetrics>, GpuQueryError>;
}

/// Probe backed by the NVIDIA Management Library.
pub struct NvmlProbe {
    /// `None` when NVML could not be initialised (no drivers / no GPU).
    nvml: Option<Nvml>,
}

impl Default for NvmlProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl NvmlProbe {
    /// Attempt to initialise NVML.
    pub fn new() -> Self {
        let nvml = match Nvml::init() {
            Ok(nvml) => {
                tracing::info!("NVML initialised successfully");
                Some(nvml)
            }
            Err(e) => {
                tracing::warn!(error = %e, "NVML unavailable -- GPU metrics will not be collected");
                None
            }
        };
        Self { nvml }
    }

    /// Number of GPUs visible to NVML, or 0 if NVML is unavailable.
    pub fn gpu_count(&self) -> u32 {
        self.nvml
            .as_ref()
            .and_then(|nvml| nvml.device_count().ok())
            .unwrap_or(0)
    }
}

impl GpuProbe for NvmlProbe {
    fn query(&self) -> Result<Option<GpuMetrics>, GpuQueryError> {
        let Some(nvml) = self.nvml.as_ref() else {
            return Ok(None);
        };

        let count = nvml
            .device_count()
            .map_err(|e| GpuQueryError(e.to_string()))?;
        if count == 0 {
            return Ok(None);
        }

        let device = nvml
            .device_by_index(0)
            .map_err(|e| GpuQueryError(e.to_string()))?;
        let name = device.name().map_err(|e| GpuQueryError(e.to_string()))?;
        let utilization = device
            .utilization_rates()
            .map_err(|e| GpuQueryError(e.to_string()))?;
        let temperature = device
            .temperature(TemperatureSensor::Gpu)
            .map_err(|e| GpuQueryError(e.to_string()))?;

        Ok(Some(GpuMetrics {
            name,
            usage_percent: f64::from(utilization.gpu),
            temperature_celsius: f64::from(temperature),
        }))
    }
}

/// Probe for hosts where GPU monitoring is switched off.
pub struct NoGpu;

impl GpuProbe for NoGpu {
    fn query(&self) -> Result<Option<GpuMetrics>, GpuQueryError> {
        Ok(None)
    }
}
