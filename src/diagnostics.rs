use crate::alerts::evaluate_alerts;
use crate::collectors::{
    HardwareReader, NetworkReader, PingProber, ProcessLister, SystemMetricsReader,
};
use crate::collectors::ping::{PING_COUNT, PING_TARGET};
use crate::error::CollectionError;
use crate::models::{
    Alert, DiskUsage, HardwareSummary, MetricSnapshot, NetworkAdapterStatus,
    NetworkInterfaceStat, PingResult, ProcessRanking, SectionTimings,
};
use crate::ranking::rank_processes;
use crate::report::{assemble_report, render_report, ReportInput};
use crate::utils::file::{report_file_name, write_report};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Host identity and start time for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub hostname: String,
    pub started_at: DateTime<Local>,
    pub started: Instant,
}

impl RunContext {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            started_at: Local::now(),
            started: Instant::now(),
        }
    }

    pub fn from_host() -> anyhow::Result<Self> {
        let hostname = sysinfo::System::host_name()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| anyhow!("Unable to resolve hostname"))?;
        Ok(Self::new(hostname.trim()))
    }
}

/// Everything collected in one run. Each source keeps its own outcome so a
/// failure only blanks its own section.
#[derive(Debug)]
pub struct Snapshot {
    pub hardware: Result<HardwareSummary, CollectionError>,
    pub metrics: Result<MetricSnapshot, CollectionError>,
    pub disks: Result<Vec<DiskUsage>, CollectionError>,
    pub ranking: Result<ProcessRanking, CollectionError>,
    pub interfaces: Result<Vec<NetworkInterfaceStat>, CollectionError>,
    pub adapters: Result<Vec<NetworkAdapterStatus>, CollectionError>,
    pub pings: Result<Vec<PingResult>, CollectionError>,
    pub alerts: Vec<Alert>,
}

pub struct Diagnostics<M, P, N, Q, H> {
    pub metrics: M,
    pub processes: P,
    pub network: N,
    pub ping: Q,
    pub hardware: H,
}

impl<M, P, N, Q, H> Diagnostics<M, P, N, Q, H>
where
    M: SystemMetricsReader,
    P: ProcessLister,
    N: NetworkReader,
    Q: PingProber,
    H: HardwareReader,
{
    /// Query every source once, in order, timing each call.
    pub async fn collect(&mut self, timings: &mut SectionTimings) -> Snapshot {
        let hardware = logged(timed_sync(timings, "Hardware", || self.hardware.hardware()));
        let metrics = logged(timed(timings, "System Metrics", self.metrics.sample()).await);
        let disks = logged(timed_sync(timings, "Disk Usage", || self.hardware.disk_usage()));
        let processes = logged(timed(timings, "Process Table", self.processes.processes()).await);
        let ranking = timed_sync(timings, "Process Ranking", || {
            processes.map(|table| rank_processes(&table))
        });
        let interfaces = logged(timed(timings, "Network Usage", self.network.interface_usage()).await);
        let adapters = logged(timed_sync(timings, "Network Adapters", || self.network.adapters()));
        let pings = logged(timed(timings, "Ping", self.ping.probe(PING_TARGET, PING_COUNT)).await);

        let alerts = timed_sync(timings, "Alert Evaluation", || {
            evaluate_alerts(
                metrics.as_ref().ok(),
                interfaces.as_deref().unwrap_or(&[]),
                adapters.as_deref().unwrap_or(&[]),
                pings.as_deref().unwrap_or(&[]),
            )
        });
        debug!("{} alerts raised", alerts.len());

        Snapshot {
            hardware,
            metrics,
            disks,
            ranking,
            interfaces,
            adapters,
            pings,
            alerts,
        }
    }

    /// Collect, print the report and write it to `output_dir`. Only report
    /// rendering and the file write are fatal.
    pub async fn run(&mut self, context: &RunContext, output_dir: &Path) -> anyhow::Result<PathBuf> {
        let mut timings = SectionTimings::new();
        let snapshot = self.collect(&mut timings).await;

        let report = assemble_report(&ReportInput {
            context,
            snapshot: &snapshot,
            timings: &timings,
            total_elapsed: context.started.elapsed(),
        });
        let text = render_report(&report).context("Failed to render report")?;
        println!("{}", text);

        let file_name = report_file_name(&context.hostname, &context.started_at);
        let path = write_report(output_dir, &file_name, &text)
            .context(format!("Failed to write report to {}", output_dir.join(&file_name).display()))?;
        info!("Report saved to {}", path.display());
        Ok(path)
    }
}

fn logged<T>(result: Result<T, CollectionError>) -> Result<T, CollectionError> {
    if let Err(e) = &result {
        warn!("Skipping {} section: {}", e.category(), e);
    }
    result
}

async fn timed<T>(timings: &mut SectionTimings, label: &str, fut: impl Future<Output = T>) -> T {
    let start = Instant::now();
    let out = fut.await;
    timings.record(label, start.elapsed());
    out
}

fn timed_sync<T>(timings: &mut SectionTimings, label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    timings.record(label, start.elapsed());
    out
}
