use crate::models::DiskUsage;
use crate::utils::units::round_to;
use log::debug;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};
use systemstat::BlockDeviceStats;

const VIRTUAL_DEVICE_PREFIXES: [&str; 5] = ["loop", "ram", "zram", "dm-", "sr"];

/// Cumulative per-device counters, both in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskCounters {
    pub io_ticks: u64,
    pub time_in_queue: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskActivity {
    pub active_percent: f64,
    pub queue_length: f64,
}

/// Keep whole physical disks only; partitions and virtual devices would
/// double count the same I/O.
pub fn whole_disk_counters(
    stats: &BTreeMap<String, BlockDeviceStats>,
    sys_block: &Path,
) -> BTreeMap<String, DiskCounters> {
    stats
        .values()
        .filter(|block| is_whole_disk(&block.name, sys_block))
        .map(|block| {
            (
                block.name.clone(),
                DiskCounters {
                    io_ticks: block.io_ticks as u64,
                    time_in_queue: block.time_in_queue as u64,
                },
            )
        })
        .collect()
}

fn is_whole_disk(name: &str, sys_block: &Path) -> bool {
    !VIRTUAL_DEVICE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
        && sys_block.join(name).exists()
}

/// Busiest disk's active time (capped at 100) and the summed average queue
/// length over the sample window.
pub fn activity(
    before: &BTreeMap<String, DiskCounters>,
    after: &BTreeMap<String, DiskCounters>,
    window: Duration,
) -> DiskActivity {
    let window_ms = window.as_secs_f64() * 1000.0;
    if window_ms <= 0.0 {
        return DiskActivity::default();
    }

    let mut busiest = 0.0f64;
    let mut queue = 0.0f64;
    for (name, end) in after {
        let Some(begin) = before.get(name) else {
            continue;
        };
        let busy_ms = end.io_ticks.saturating_sub(begin.io_ticks) as f64;
        let queued_ms = end.time_in_queue.saturating_sub(begin.time_in_queue) as f64;
        busiest = busiest.max(busy_ms / window_ms * 100.0);
        queue += queued_ms / window_ms;
    }

    DiskActivity {
        active_percent: round_to(busiest.min(100.0), 2),
        queue_length: round_to(queue, 2),
    }
}

/// Usage of every mounted file system. No mounts is an empty list, not a
/// failure.
pub fn collect_usage(disks: &sysinfo::Disks) -> Vec<DiskUsage> {
    let start = Instant::now();
    let result = disks
        .list()
        .iter()
        .map(|disk| {
            let total = disk.total_space();
            let available = disk.available_space();
            let used_percent = if total > 0 {
                total.saturating_sub(available) as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            DiskUsage {
                mount_point: disk.mount_point().to_string_lossy().into_owned(),
                device: disk.name().to_string_lossy().into_owned(),
                file_system: disk.file_system().to_string_lossy().into_owned(),
                total_bytes: total,
                available_bytes: available,
                used_percent: round_to(used_percent, 2),
            }
        })
        .collect();

    debug!("collect_usage took: {} ms", start.elapsed().as_millis());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn counters(entries: &[(&str, u64, u64)]) -> BTreeMap<String, DiskCounters> {
        entries
            .iter()
            .map(|(name, io_ticks, time_in_queue)| {
                (
                    name.to_string(),
                    DiskCounters {
                        io_ticks: *io_ticks,
                        time_in_queue: *time_in_queue,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_activity_uses_busiest_disk_and_sums_queue() {
        let before = counters(&[("sda", 1_000, 2_000), ("nvme0n1", 500, 100)]);
        let after = counters(&[("sda", 1_250, 3_500), ("nvme0n1", 1_400, 600)]);
        let activity = activity(&before, &after, Duration::from_secs(1));
        assert_eq!(activity.active_percent, 90.0);
        assert_eq!(activity.queue_length, 2.0);
    }

    #[test]
    fn test_activity_caps_and_ignores_new_devices() {
        let before = counters(&[("sda", 0, 0)]);
        let after = counters(&[("sda", 1_500, 0), ("sdb", 10_000, 10_000)]);
        let activity = activity(&before, &after, Duration::from_secs(1));
        assert_eq!(activity.active_percent, 100.0);
        assert_eq!(activity.queue_length, 0.0);
    }

    #[test]
    fn test_no_mounts_is_an_empty_list() {
        assert!(collect_usage(&sysinfo::Disks::new()).is_empty());
    }

    #[test]
    fn test_activity_with_empty_window() {
        let before = counters(&[("sda", 0, 0)]);
        let after = counters(&[("sda", 10, 10)]);
        assert_eq!(activity(&before, &after, Duration::ZERO), DiskActivity::default());
    }

    #[test]
    fn test_is_whole_disk() {
        let dir = tempdir().unwrap();
        for name in ["sda", "loop0", "dm-0"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        assert!(is_whole_disk("sda", dir.path()));
        assert!(!is_whole_disk("sda1", dir.path()));
        assert!(!is_whole_disk("loop0", dir.path()));
        assert!(!is_whole_disk("dm-0", dir.path()));
    }
}
