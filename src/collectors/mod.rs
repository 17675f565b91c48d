//! Metric sources. Each trait is one category of OS query; the production
//! implementations live in the submodules and tests substitute fakes.
#![allow(async_fn_in_trait)]

pub mod disk;
pub mod hardware;
pub mod network;
pub mod ping;
pub mod process;
pub mod system;

use crate::error::CollectionError;
use crate::models::{
    DiskUsage, HardwareSummary, MetricSnapshot, NetworkAdapterStatus, NetworkInterfaceStat,
    PingResult, ProcessInfo,
};
use sysinfo::{CpuRefreshKind, System};

pub use hardware::HardwareInventory;
pub use network::NetworkCounters;
pub use ping::SystemPing;
pub use process::ProcessTable;
pub use system::SystemCounters;

pub const SYSTEM_METRICS: &str = "system metrics";
pub const PROCESS_TABLE: &str = "process table";
pub const NETWORK_USAGE: &str = "network usage";
pub const NETWORK_ADAPTERS: &str = "network adapters";
pub const PING: &str = "ping";
pub const HARDWARE: &str = "hardware";

pub trait SystemMetricsReader {
    async fn sample(&mut self) -> Result<MetricSnapshot, CollectionError>;
}

pub trait ProcessLister {
    async fn processes(&mut self) -> Result<Vec<ProcessInfo>, CollectionError>;
}

pub trait NetworkReader {
    async fn interface_usage(&mut self) -> Result<Vec<NetworkInterfaceStat>, CollectionError>;
    fn adapters(&mut self) -> Result<Vec<NetworkAdapterStatus>, CollectionError>;
}

pub trait PingProber {
    /// Send `count` echo requests. Unanswered requests come back with no
    /// round-trip time; an error means the probe itself could not run.
    async fn probe(&mut self, target: &str, count: u32) -> Result<Vec<PingResult>, CollectionError>;
}

pub trait HardwareReader {
    fn hardware(&mut self) -> Result<HardwareSummary, CollectionError>;
    fn disk_usage(&mut self) -> Result<Vec<DiskUsage>, CollectionError>;
}

pub fn logical_core_count() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu_list(CpuRefreshKind::nothing());
    sys.cpus().len().max(1)
}
