use crate::diagnostics::{RunContext, Snapshot};
use crate::error::CollectionError;
use crate::models::SectionTimings;
use crate::report::{Column, Report, Section, SectionBody, Table};
use humansize::{format_size, BINARY};
use std::time::Duration;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct ReportInput<'a> {
    pub context: &'a RunContext,
    pub snapshot: &'a Snapshot,
    pub timings: &'a SectionTimings,
    pub total_elapsed: Duration,
}

/// Build the report model. Every section is always present; collection
/// failures become an explicit placeholder.
pub fn assemble_report(input: &ReportInput<'_>) -> Report {
    let snapshot = input.snapshot;
    let sections = vec![
        host_section(input.context),
        section("Hardware", &snapshot.hardware, |hw| {
            SectionBody::Fields(vec![
                field("CPU Model", &hw.cpu_model),
                field("Logical Cores", hw.logical_cores),
                field("Total RAM", format!("{:.2} GB", hw.total_ram_gb)),
            ])
        }),
        section("Live Metrics", &snapshot.metrics, |m| {
            SectionBody::Fields(vec![
                field("CPU Load", format!("{:.2} %", m.cpu_load_percent)),
                field("Processor Queue Length", m.processor_queue_length),
                field("Available RAM", format!("{} MB", m.available_ram_mb)),
                field("Commit Charge", format!("{:.2} %", m.commit_charge_percent)),
                field("Disk Active Time", format!("{:.2} %", m.disk_active_percent)),
                field("Disk Queue Length", format!("{:.2}", m.disk_queue_length)),
                field("Sampled At", m.captured_at.format(TIME_FORMAT)),
            ])
        }),
        section("Disk Usage", &snapshot.disks, |disks| {
            table(
                vec![
                    Column::left("Mount"),
                    Column::left("Device"),
                    Column::left("FS"),
                    Column::right("Size"),
                    Column::right("Free"),
                    Column::right("Used %"),
                ],
                disks.iter().map(|d| {
                    vec![
                        d.mount_point.clone(),
                        d.device.clone(),
                        d.file_system.clone(),
                        format_size(d.total_bytes, BINARY),
                        format_size(d.available_bytes, BINARY),
                        format!("{:.2}", d.used_percent),
                    ]
                }),
            )
        }),
        section("Top Processes by CPU", &snapshot.ranking, |ranking| {
            table(
                vec![
                    Column::left("Name"),
                    Column::right("PID"),
                    Column::right("CPU %"),
                    Column::right("Memory (MB)"),
                ],
                ranking.top_cpu.iter().map(|p| {
                    vec![
                        p.name.clone(),
                        p.pid.to_string(),
                        format!("{:.2}", p.cpu_percent),
                        format!("{:.2}", p.memory_mb),
                    ]
                }),
            )
        }),
        section("Top Processes by Memory", &snapshot.ranking, |ranking| {
            table(
                vec![
                    Column::left("Name"),
                    Column::right("PID"),
                    Column::right("Memory (MB)"),
                    Column::right("CPU Seconds"),
                ],
                ranking.top_memory.iter().map(|p| {
                    vec![
                        p.name.clone(),
                        p.pid.to_string(),
                        format!("{:.2}", p.memory_mb),
                        format!("{:.2}", p.cpu_seconds),
                    ]
                }),
            )
        }),
        section("Memory by Process Name", &snapshot.ranking, |ranking| {
            table(
                vec![
                    Column::left("Name"),
                    Column::right("Instances"),
                    Column::right("Memory (MB)"),
                ],
                ranking.by_name.iter().map(|g| {
                    vec![
                        g.name.clone(),
                        g.instances.to_string(),
                        format!("{:.2}", g.memory_mb),
                    ]
                }),
            )
        }),
        section("Network Usage", &snapshot.interfaces, |interfaces| {
            table(
                vec![
                    Column::left("Interface"),
                    Column::right("Sent KB/s"),
                    Column::right("Received KB/s"),
                ],
                interfaces.iter().map(|i| {
                    vec![
                        i.name.clone(),
                        format!("{:.2}", i.sent_kb_per_sec),
                        format!("{:.2}", i.received_kb_per_sec),
                    ]
                }),
            )
        }),
        section("Network Adapters", &snapshot.adapters, |adapters| {
            table(
                vec![
                    Column::left("Adapter"),
                    Column::left("Status"),
                    Column::right("Link Speed"),
                ],
                adapters.iter().map(|a| {
                    vec![a.name.clone(), a.state.to_string(), a.link_speed_display()]
                }),
            )
        }),
        section("Ping Results", &snapshot.pings, |pings| {
            table(
                vec![
                    Column::left("Target"),
                    Column::right("Attempt"),
                    Column::right("Round Trip"),
                ],
                pings.iter().map(|p| {
                    vec![
                        p.target.clone(),
                        p.sequence.to_string(),
                        p.round_trip_ms
                            .map(|rtt| format!("{} ms", rtt))
                            .unwrap_or_else(|| "Timed out".to_string()),
                    ]
                }),
            )
        }),
        Section::new(
            "Alerts",
            SectionBody::Lines {
                lines: snapshot.alerts.iter().map(|a| a.to_string()).collect(),
                empty: "None detected.".to_string(),
            },
        ),
        Section::new(
            "Section Timings",
            table(
                vec![Column::left("Section"), Column::right("Elapsed")],
                input
                    .timings
                    .iter()
                    .map(|(label, elapsed)| vec![label.to_string(), format_elapsed(elapsed)]),
            ),
        ),
        Section::new(
            "Total",
            SectionBody::Fields(vec![field("Total Elapsed", format_elapsed(input.total_elapsed))]),
        ),
    ];

    Report {
        title: "System Diagnostic Report".to_string(),
        sections,
    }
}

fn host_section(context: &RunContext) -> Section {
    Section::new(
        "Host",
        SectionBody::Fields(vec![
            field("Hostname", &context.hostname),
            field("Captured", context.started_at.format(TIME_FORMAT)),
        ]),
    )
}

fn section<T>(
    title: &str,
    data: &Result<T, CollectionError>,
    body: impl FnOnce(&T) -> SectionBody,
) -> Section {
    match data {
        Ok(value) => Section::new(title, body(value)),
        Err(err) => Section::new(title, SectionBody::Unavailable(err.to_string())),
    }
}

fn field(label: &str, value: impl std::fmt::Display) -> (String, String) {
    (label.to_string(), value.to_string())
}

fn table(columns: Vec<Column>, rows: impl Iterator<Item = Vec<String>>) -> SectionBody {
    SectionBody::Table(Table {
        columns,
        rows: rows.collect(),
    })
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2} s", elapsed.as_secs_f64())
}
