//! Threshold rules that turn a snapshot into bottleneck alerts.
//!
//! Rules run in a fixed order and every threshold is strict, so a reading
//! sitting exactly on a limit never fires.

use crate::models::{
    Alert, AlertCategory, MetricSnapshot, NetworkAdapterStatus, NetworkInterfaceStat, PingResult,
};

pub const CPU_LOAD_PERCENT: f64 = 85.0;
pub const PROCESSOR_QUEUE_LENGTH: u64 = 2;
pub const AVAILABLE_RAM_MB: u64 = 500;
pub const COMMIT_CHARGE_PERCENT: f64 = 85.0;
pub const DISK_ACTIVE_PERCENT: f64 = 80.0;
pub const DISK_QUEUE_LENGTH: f64 = 2.0;
pub const NETWORK_KB_PER_SEC: f64 = 5000.0;
pub const PING_LATENCY_MS: f64 = 100.0;

/// Evaluate every rule against one run's data. `metrics` is `None` when the
/// system counters could not be sampled; the counter rules are then skipped.
pub fn evaluate_alerts(
    metrics: Option<&MetricSnapshot>,
    interfaces: &[NetworkInterfaceStat],
    adapters: &[NetworkAdapterStatus],
    pings: &[PingResult],
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(m) = metrics {
        evaluate_counters(m, &mut alerts);
    }

    for iface in interfaces {
        if iface.sent_kb_per_sec > NETWORK_KB_PER_SEC
            || iface.received_kb_per_sec > NETWORK_KB_PER_SEC
        {
            alerts.push(Alert::new(
                AlertCategory::NetworkThroughput,
                format!(
                    "High network usage on {}: sent {:.2} KB/s, received {:.2} KB/s",
                    iface.name, iface.sent_kb_per_sec, iface.received_kb_per_sec
                ),
            ));
        }
    }

    for adapter in adapters.iter().filter(|a| !a.state.is_up()) {
        alerts.push(Alert::new(
            AlertCategory::Adapter,
            format!("Network adapter '{}' is {}", adapter.name, adapter.state),
        ));
    }

    for ping in pings {
        if let Some(rtt) = ping.round_trip_ms.filter(|rtt| *rtt > PING_LATENCY_MS) {
            alerts.push(Alert::new(
                AlertCategory::Latency,
                format!("High latency to {}: {} ms", ping.target, rtt),
            ));
        }
    }

    alerts
}

fn evaluate_counters(m: &MetricSnapshot, alerts: &mut Vec<Alert>) {
    if m.cpu_load_percent > CPU_LOAD_PERCENT {
        alerts.push(Alert::new(
            AlertCategory::Cpu,
            format!("High CPU usage: {:.2}%", m.cpu_load_percent),
        ));
    }
    if m.processor_queue_length > PROCESSOR_QUEUE_LENGTH {
        alerts.push(Alert::new(
            AlertCategory::Cpu,
            format!(
                "High processor queue length: {} (threads waiting for CPU)",
                m.processor_queue_length
            ),
        ));
    }
    if m.available_ram_mb < AVAILABLE_RAM_MB {
        alerts.push(Alert::new(
            AlertCategory::Memory,
            format!("Low available memory: {} MB", m.available_ram_mb),
        ));
    }
    if m.commit_charge_percent > COMMIT_CHARGE_PERCENT {
        alerts.push(Alert::new(
            AlertCategory::Memory,
            format!("High commit charge: {:.2}%", m.commit_charge_percent),
        ));
    }
    if m.disk_active_percent > DISK_ACTIVE_PERCENT {
        alerts.push(Alert::new(
            AlertCategory::Disk,
            format!("High disk active time: {:.2}%", m.disk_active_percent),
        ));
    }
    if m.disk_queue_length > DISK_QUEUE_LENGTH {
        alerts.push(Alert::new(
            AlertCategory::Disk,
            format!("High disk queue length: {:.2}", m.disk_queue_length),
        ));
    }
}
