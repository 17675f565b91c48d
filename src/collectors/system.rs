use crate::collectors::disk::{self, DiskCounters};
use crate::collectors::{logical_core_count, SystemMetricsReader, SYSTEM_METRICS};
use crate::error::CollectionError;
use crate::models::MetricSnapshot;
use crate::utils::sysfs::find_field;
use crate::utils::units::{round_to, MIB};
use chrono::Local;
use log::{debug, error};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use systemstat::{Memory, Platform, System};

/// System-wide counters sampled over one window: CPU load, run queue,
/// memory, commit charge and disk activity.
pub struct SystemCounters {
    sys: System,
    interval: Duration,
    logical_cores: usize,
    proc_root: PathBuf,
    sys_block: PathBuf,
}

impl SystemCounters {
    pub fn new(interval: Duration) -> Self {
        Self {
            sys: System::new(),
            interval: interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
            logical_cores: logical_core_count(),
            proc_root: PathBuf::from("/proc"),
            sys_block: PathBuf::from("/sys/block"),
        }
    }

    /// Per-device counters only exist on Linux; elsewhere disk activity
    /// reads as idle.
    fn disk_counters(&self) -> BTreeMap<String, DiskCounters> {
        match self.sys.block_device_statistics() {
            Ok(stats) => disk::whole_disk_counters(&stats, &self.sys_block),
            Err(e) => {
                debug!("Block device statistics unavailable: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn processor_queue_length(&self) -> u64 {
        let cores = self.logical_cores as u64;
        if let Ok(stat) = std::fs::read_to_string(self.proc_root.join("stat")) {
            if let Some(running) = find_field::<u64>(&stat, "procs_running") {
                return running.saturating_sub(cores);
            }
        }

        // Without /proc/stat the one minute load average is the closest proxy.
        match self.sys.load_average() {
            Ok(load) => round_to(load.one as f64 - cores as f64, 0) as u64,
            Err(e) => {
                debug!("Load average unavailable: {}", e);
                0
            }
        }
    }

    fn commit_charge_percent(&self, memory: &Memory) -> f64 {
        if let Some(percent) = committed_as_percent(memory) {
            return percent;
        }
        let (swap_total, swap_free) = match self.sys.swap() {
            Ok(swap) => (swap.total.as_u64(), swap.free.as_u64()),
            Err(e) => {
                debug!("Swap statistics unavailable: {}", e);
                (0, 0)
            }
        };
        used_memory_percent(memory.total.as_u64(), memory.free.as_u64(), swap_total, swap_free)
    }
}

impl SystemMetricsReader for SystemCounters {
    async fn sample(&mut self) -> Result<MetricSnapshot, CollectionError> {
        let start = Instant::now();

        let cpu = self
            .sys
            .cpu_load_aggregate()
            .map_err(|e| CollectionError::io(SYSTEM_METRICS, e))?;
        let disks_before = self.disk_counters();
        let window = Instant::now();

        tokio::time::sleep(self.interval).await;

        let cpu = cpu.done().map_err(|e| {
            error!("CPU load measurement error: {}", e);
            CollectionError::io(SYSTEM_METRICS, e)
        })?;
        let disks_after = self.disk_counters();
        let activity = disk::activity(&disks_before, &disks_after, window.elapsed());

        let memory = self
            .sys
            .memory()
            .map_err(|e| CollectionError::io(SYSTEM_METRICS, e))?;
        let commit_charge = self.commit_charge_percent(&memory);

        let result = MetricSnapshot {
            cpu_load_percent: round_to((1.0 - cpu.idle as f64) * 100.0, 2),
            processor_queue_length: self.processor_queue_length(),
            available_ram_mb: (memory.free.as_u64() as f64 / MIB) as u64,
            commit_charge_percent: round_to(commit_charge, 2),
            disk_active_percent: activity.active_percent,
            disk_queue_length: activity.queue_length,
            captured_at: Local::now(),
        };
        debug!("sample_system_metrics took: {} ms", start.elapsed().as_millis());
        Ok(result)
    }
}

#[cfg(target_os = "linux")]
fn committed_as_percent(memory: &Memory) -> Option<f64> {
    let meminfo = &memory.platform_memory.meminfo;
    let committed = meminfo.get("Committed_AS")?;
    let limit = meminfo.get("CommitLimit")?;
    Some(ratio_percent(committed.as_u64(), limit.as_u64()))
}

#[cfg(not(target_os = "linux"))]
fn committed_as_percent(_memory: &Memory) -> Option<f64> {
    None
}

/// Commit charge approximated as used RAM plus used swap over their totals.
pub fn used_memory_percent(ram_total: u64, ram_free: u64, swap_total: u64, swap_free: u64) -> f64 {
    let used = ram_total.saturating_sub(ram_free) + swap_total.saturating_sub(swap_free);
    ratio_percent(used, ram_total.saturating_add(swap_total))
}

fn ratio_percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn counters_with_proc(proc_root: &Path, logical_cores: usize) -> SystemCounters {
        SystemCounters {
            sys: System::new(),
            interval: Duration::from_millis(200),
            logical_cores,
            proc_root: proc_root.to_path_buf(),
            sys_block: PathBuf::from("/sys/block"),
        }
    }

    #[test]
    fn test_queue_length_counts_runnable_beyond_cores() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("stat"),
            "cpu  10 0 10 100 0 0 0 0 0 0\nprocs_running 7\nprocs_blocked 1\n",
        )
        .unwrap();

        assert_eq!(counters_with_proc(dir.path(), 4).processor_queue_length(), 3);
        assert_eq!(counters_with_proc(dir.path(), 16).processor_queue_length(), 0);
    }

    #[test]
    fn test_queue_length_without_proc_stat_still_resolves() {
        let dir = tempdir().unwrap();
        // Load average fallback, with more cores than any load can reach.
        let counters = counters_with_proc(&dir.path().join("missing"), usize::MAX / 2);
        assert_eq!(counters.processor_queue_length(), 0);
    }

    #[test]
    fn test_used_memory_percent_counts_ram_and_swap() {
        let gib = 1024 * 1024 * 1024;
        assert_eq!(used_memory_percent(8 * gib, 2 * gib, 2 * gib, gib), 70.0);
        assert_eq!(used_memory_percent(4 * gib, gib, 0, 0), 75.0);
        assert_eq!(used_memory_percent(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_missing_block_statistics_read_as_idle() {
        let dir = tempdir().unwrap();
        let mut counters = counters_with_proc(dir.path(), 4);
        counters.sys_block = dir.path().join("no-block-devices");
        // No whole disks qualify, so activity is zero rather than an error.
        let before = counters.disk_counters();
        assert!(before.is_empty());
        let activity = disk::activity(&before, &counters.disk_counters(), Duration::from_secs(1));
        assert_eq!(activity, disk::DiskActivity::default());
    }

    #[test]
    fn test_ratio_percent() {
        assert_eq!(ratio_percent(50, 200), 25.0);
        assert_eq!(ratio_percent(5, 0), 0.0);
        assert_eq!(round_to(ratio_percent(1, 3), 2), 33.33);
    }
}
