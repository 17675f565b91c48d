//! Top-N views over a process table snapshot.
//!
//! Everything here is pure: the process table comes in, three ranked lists
//! come out. Ties are broken explicitly (pid ascending for per-process lists,
//! name ascending for groups) so output never depends on enumeration order.

use crate::models::{CpuRank, MemoryRank, ProcessGroup, ProcessInfo, ProcessRanking};
use crate::utils::units::bytes_to_mb;
use std::collections::BTreeMap;

pub const TOP_N: usize = 10;

pub fn rank_processes(processes: &[ProcessInfo]) -> ProcessRanking {
    ProcessRanking {
        top_cpu: top_by_cpu(processes, TOP_N),
        top_memory: top_by_memory(processes, TOP_N),
        by_name: group_by_name(processes, TOP_N),
    }
}

pub fn top_by_cpu(processes: &[ProcessInfo], count: usize) -> Vec<CpuRank> {
    let mut sorted: Vec<&ProcessInfo> = processes.iter().collect();
    sorted.sort_by(|a, b| {
        b.cpu_percent
            .total_cmp(&a.cpu_percent)
            .then_with(|| a.pid.cmp(&b.pid))
    });
    sorted
        .into_iter()
        .take(count)
        .map(|p| CpuRank {
            name: p.name.clone(),
            pid: p.pid,
            cpu_percent: p.cpu_percent,
            memory_mb: bytes_to_mb(p.memory_bytes),
        })
        .collect()
}

pub fn top_by_memory(processes: &[ProcessInfo], count: usize) -> Vec<MemoryRank> {
    let mut sorted: Vec<&ProcessInfo> = processes.iter().collect();
    sorted.sort_by(|a, b| {
        b.memory_bytes
            .cmp(&a.memory_bytes)
            .then_with(|| a.pid.cmp(&b.pid))
    });
    sorted
        .into_iter()
        .take(count)
        .map(|p| MemoryRank {
            name: p.name.clone(),
            pid: p.pid,
            memory_mb: bytes_to_mb(p.memory_bytes),
            cpu_seconds: p.cpu_seconds,
        })
        .collect()
}

pub fn group_by_name(processes: &[ProcessInfo], count: usize) -> Vec<ProcessGroup> {
    // name -> (instances, summed bytes)
    let mut groups: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
    for p in processes {
        let entry = groups.entry(p.name.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(p.memory_bytes);
    }

    let mut sorted: Vec<(&str, (usize, u64))> = groups.into_iter().collect();
    // BTreeMap iteration is already name-ordered, the stable sort keeps it for ties.
    sorted.sort_by(|a, b| b.1 .1.cmp(&a.1 .1));
    sorted
        .into_iter()
        .take(count)
        .map(|(name, (instances, bytes))| ProcessGroup {
            name: name.to_string(),
            instances,
            memory_mb: bytes_to_mb(bytes),
        })
        .collect()
}
