use crate::collectors::{logical_core_count, ProcessLister, PROCESS_TABLE};
use crate::error::CollectionError;
use crate::models::ProcessInfo;
use crate::utils::units::round_to;
use log::debug;
use std::time::{Duration, Instant};
use sysinfo::{ProcessesToUpdate, System};

pub struct ProcessTable {
    system: System,
    interval: Duration,
    logical_cores: usize,
}

impl ProcessTable {
    pub fn new(interval: Duration) -> Self {
        Self {
            system: System::new(),
            interval: interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
            logical_cores: logical_core_count(),
        }
    }
}

impl ProcessLister for ProcessTable {
    async fn processes(&mut self) -> Result<Vec<ProcessInfo>, CollectionError> {
        let start = Instant::now();

        // Per-process CPU usage is a delta between two refreshes.
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        tokio::time::sleep(self.interval).await;
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        if self.system.processes().is_empty() {
            return Err(CollectionError::unavailable(
                PROCESS_TABLE,
                "process enumeration returned no processes",
            ));
        }

        let result: Vec<ProcessInfo> = self
            .system
            .processes()
            .iter()
            // Linux lists every task of a process; keep only the thread group leaders.
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, process)| ProcessInfo {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                memory_bytes: process.memory(),
                cpu_seconds: round_to(process.accumulated_cpu_time() as f64 / 1000.0, 2),
                cpu_percent: normalize_cpu(process.cpu_usage(), self.logical_cores),
            })
            .collect();

        debug!(
            "collect_processes took: {} ms ({} processes)",
            start.elapsed().as_millis(),
            result.len()
        );
        Ok(result)
    }
}

/// The raw counter is relative to a single core and can exceed 100.
fn normalize_cpu(raw: f32, logical_cores: usize) -> f64 {
    round_to(raw as f64 / logical_cores.max(1) as f64, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cpu_divides_by_cores() {
        assert_eq!(normalize_cpu(400.0, 8), 50.0);
        assert_eq!(normalize_cpu(100.0, 3), 33.33);
        assert_eq!(normalize_cpu(12.5, 0), 12.5);
        assert_eq!(normalize_cpu(0.0, 4), 0.0);
    }

    #[cfg(target_os = "linux")]
    fn thread_group_id(pid: u32) -> Option<u32> {
        let status = std::fs::read_to_string(format!("/proc/{pid}/status")).ok()?;
        crate::utils::sysfs::find_field::<u32>(&status, "Tgid:")
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_processes_exclude_threads() {
        // Keep some extra threads of this process alive while sampling.
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let rx = std::sync::Arc::new(std::sync::Mutex::new(rx));
        let workers: Vec<_> = (0..3)
            .map(|_| {
                let rx = rx.clone();
                std::thread::spawn(move || {
                    let _ = rx.lock().map(|r| r.recv());
                })
            })
            .collect();

        let mut table = ProcessTable::new(Duration::from_millis(0));
        let processes = table.processes().await.unwrap();
        drop(tx);
        for worker in workers {
            worker.join().unwrap();
        }

        let own_pid = std::process::id();
        assert_eq!(processes.iter().filter(|p| p.pid == own_pid).count(), 1);
        let threads: Vec<u32> = processes
            .iter()
            .filter(|p| thread_group_id(p.pid).is_some_and(|tgid| tgid != p.pid))
            .map(|p| p.pid)
            .collect();
        assert!(threads.is_empty(), "threads listed as processes: {threads:?}");
    }
}
