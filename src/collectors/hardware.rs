use crate::collectors::{disk, HardwareReader, HARDWARE};
use crate::error::CollectionError;
use crate::models::{DiskUsage, HardwareSummary};
use crate::utils::units::bytes_to_gb;
use log::debug;
use std::time::Instant;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, System};

/// One-shot hardware inventory and mounted file systems.
pub struct HardwareInventory {
    system: System,
}

impl HardwareInventory {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for HardwareInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareReader for HardwareInventory {
    fn hardware(&mut self) -> Result<HardwareSummary, CollectionError> {
        let start = Instant::now();
        self.system.refresh_cpu_list(CpuRefreshKind::nothing());
        self.system.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

        let cpu_model = self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .ok_or_else(|| CollectionError::unavailable(HARDWARE, "no CPUs reported"))?;

        let result = HardwareSummary {
            cpu_model,
            logical_cores: self.system.cpus().len(),
            total_ram_gb: bytes_to_gb(self.system.total_memory()),
        };
        debug!("collect_hardware took: {} ms", start.elapsed().as_millis());
        Ok(result)
    }

    fn disk_usage(&mut self) -> Result<Vec<DiskUsage>, CollectionError> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disk::collect_usage(&disks))
    }
}
