//! One-off hardware description for the specs endpoint.
//!
//! Manufacturer and model come from the SMBIOS/DMI tables exposed under
//! `/sys/class/dmi/id` on Linux. Everything else comes from `sysinfo`.
//! Every field has a fallback, so the lookup never fails.

use khm_core::host::{format_ram_total, HostInfo, GENERIC_MODEL, UNKNOWN_MANUFACTURER};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

const DMI_DIR: &str = "/sys/class/dmi/id";

/// Describe the local machine. Performs blocking reads.
pub fn host_info() -> HostInfo {
    let system = System::new_with_specifics(
        RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing())
            .with_memory(MemoryRefreshKind::nothing().with_ram()),
    );

    let processor = system
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string());

    let os = match (System::name(), System::os_version()) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name,
        _ => System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
    };

    HostInfo {
        node: System::host_name().unwrap_or_else(|| "localhost".to_string()),
        os,
        manufacturer: read_dmi("sys_vendor").unwrap_or_else(|| UNKNOWN_MANUFACTURER.to_string()),
        model: read_dmi("product_name").unwrap_or_else(|| GENERIC_MODEL.to_string()),
        processor,
        ram_total: format_ram_total(system.total_memory()),
    }
}

fn read_dmi(field: &str) -> Option<String> {
    let path = std::path::Path::new(DMI_DIR).join(field);
    match std::fs::read_to_string(&path) {
        Ok(raw) => clean_dmi_value(&raw),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "DMI field unavailable");
            None
        }
    }
}

/// Firmware fills unset fields with placeholders; treat those as missing.
fn clean_dmi_value(raw: &str) -> Option<String> {
    let value = raw.trim();
    let placeholder = value.is_empty()
        || value.eq_ignore_ascii_case("to be filled by o.e.m.")
        || value.eq_ignore_ascii_case("default string")
        || value.eq_ignore_ascii_case("system product name");
    (!placeholder).then(|| value.to_string())
}
