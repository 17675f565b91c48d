use chrono::{DateTime, Local};

/// Live system counters, rounded where they are produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    pub cpu_load_percent: f64,
    pub processor_queue_length: u64,
    pub available_ram_mb: u64,
    pub commit_charge_percent: f64,
    pub disk_active_percent: f64,
    pub disk_queue_length: f64,
    pub captured_at: DateTime<Local>,
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self {
            cpu_load_percent: 0.0,
            processor_queue_length: 0,
            available_ram_mb: 0,
            commit_charge_percent: 0.0,
            disk_active_percent: 0.0,
            disk_queue_length: 0.0,
            captured_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardwareSummary {
    pub cpu_model: String,
    pub logical_cores: usize,
    pub total_ram_gb: f64,
}
