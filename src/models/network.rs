use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkInterfaceStat {
    pub name: String,
    pub sent_kb_per_sec: f64,
    pub received_kb_per_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Up,
    Down,
    Disconnected,
    Dormant,
    NotPresent,
    Testing,
    Unknown,
}

impl LinkState {
    pub fn is_up(self) -> bool {
        self == LinkState::Up
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LinkState::Up => "Up",
            LinkState::Down => "Down",
            LinkState::Disconnected => "Disconnected",
            LinkState::Dormant => "Dormant",
            LinkState::NotPresent => "Not Present",
            LinkState::Testing => "Testing",
            LinkState::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkAdapterStatus {
    pub name: String,
    pub state: LinkState,
    pub link_speed_mbps: Option<u64>,
}

impl NetworkAdapterStatus {
    pub fn link_speed_display(&self) -> String {
        match self.link_speed_mbps {
            Some(mbps) if mbps >= 1000 && mbps % 1000 == 0 => format!("{} Gbps", mbps / 1000),
            Some(mbps) => format!("{} Mbps", mbps),
            None => "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingResult {
    pub target: String,
    pub sequence: u32,
    /// `None` when no reply arrived before the deadline.
    pub round_trip_ms: Option<f64>,
}
