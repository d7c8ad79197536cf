//! `sysinfo`-backed OS resource inspector.
//!
//! Supplies the black-box numeric inputs the alert engine consumes:
//! global CPU%, RAM%, root filesystem usage and component temperatures.
//! CPU usage needs two refreshes to settle, so the first reading after
//! startup may be low; at monitor intervals this is irrelevant.

use pictl_common::metrics::SensorReading;
use pictl_common::traits::{InspectError, ResourceInspector};
use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

/// OS resource inspector backed by the `sysinfo` crate.
pub struct SysinfoInspector {
    system: System,
}

impl SysinfoInspector {
    /// Create an inspector and prime the CPU counters.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
        );
        Self { system }
    }
}

impl Default for SysinfoInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceInspector for SysinfoInspector {
    fn cpu_percent(&mut self) -> Result<f64, InspectError> {
        self.system.refresh_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
        );
        Ok(f64::from(self.system.global_cpu_usage()))
    }

    fn ram_percent(&mut self) -> Result<f64, InspectError> {
        self.system.refresh_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        let total = self.system.total_memory();
        if total == 0 {
            return Err(InspectError::Unavailable {
                metric: "ram",
                reason: "total memory reported as zero".to_string(),
            });
        }
        Ok(self.system.used_memory() as f64 / total as f64 * 100.0)
    }

    fn disk_percent(&mut self) -> Result<f64, InspectError> {
        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .or_else(|| disks.iter().max_by_key(|d| d.total_space()))
            .ok_or_else(|| InspectError::Unavailable {
                metric: "disk",
                reason: "no disks reported".to_string(),
            })?;

        let total = root.total_space();
        if total == 0 {
            return Err(InspectError::Unavailable {
                metric: "disk",
                reason: "root filesystem reports zero size".to_string(),
            });
        }
        let used = total.saturating_sub(root.available_space());
        Ok(used as f64 / total as f64 * 100.0)
    }

    fn temperatures(&mut self) -> Result<Vec<SensorReading>, InspectError> {
        let components = Components::new_with_refreshed_list();
        Ok(components
            .iter()
            .filter_map(|c| c.temperature().map(|t| (c, t)))
            .filter(|(_, t)| !t.is_nan())
            .map(|(c, t)| SensorReading {
                label: c.label().to_string(),
                celsius: f64::from(t),
            })
            .collect())
    }
}
