pub mod alerts;
pub mod collectors;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod ranking;
pub mod report;
pub mod utils;

use crate::collectors::{HardwareInventory, NetworkCounters, ProcessTable, SystemCounters, SystemPing};
use crate::config::AppConfig;
use crate::diagnostics::{Diagnostics, RunContext};
use anyhow::Context;
use log::{debug, error, info};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    info!("Starting diagnostic snapshot");

    let context = RunContext::from_host().context("Failed to resolve host identity")?;
    debug!("Run context: {:?}", context);

    let interval = config.sampling_interval();
    let mut diagnostics = Diagnostics {
        metrics: SystemCounters::new(interval),
        processes: ProcessTable::new(interval),
        network: NetworkCounters::new(interval),
        ping: SystemPing,
        hardware: HardwareInventory::new(),
    };

    match diagnostics.run(&context, &config.output_dir()).await {
        Ok(path) => {
            info!("Diagnostic snapshot completed: {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Diagnostic snapshot error: {e:#}");
            for cause in e.chain().skip(1) {
                error!("Caused by: {cause}");
            }
            Err(e).context("Diagnostic snapshot failed")
        }
    }
}
