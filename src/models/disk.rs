#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskUsage {
    pub mount_point: String,
    pub device: String,
    pub file_system: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_percent: f64,
}
