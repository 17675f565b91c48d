/// One row of the process table as sampled during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub memory_bytes: u64,
    pub cpu_seconds: f64,
    /// Share of total machine CPU, already divided by the logical core count.
    pub cpu_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuRank {
    pub name: String,
    pub pid: u32,
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRank {
    pub name: String,
    pub pid: u32,
    pub memory_mb: f64,
    pub cpu_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessGroup {
    pub name: String,
    pub instances: usize,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessRanking {
    pub top_cpu: Vec<CpuRank>,
    pub top_memory: Vec<MemoryRank>,
    pub by_name: Vec<ProcessGroup>,
}
