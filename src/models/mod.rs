pub(crate) mod alert;
pub(crate) mod disk;
pub(crate) mod network;
pub(crate) mod process;
pub(crate) mod system;
pub(crate) mod timing;

pub use alert::{Alert, AlertCategory};
pub use disk::DiskUsage;
pub use network::{LinkState, NetworkAdapterStatus, NetworkInterfaceStat, PingResult};
pub use process::{CpuRank, MemoryRank, ProcessGroup, ProcessInfo, ProcessRanking};
pub use system::{HardwareSummary, MetricSnapshot};
pub use timing::SectionTimings;
