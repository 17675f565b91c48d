use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCategory {
    Cpu,
    Memory,
    Disk,
    NetworkThroughput,
    Adapter,
    Latency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub category: AlertCategory,
    pub message: String,
}

impl Alert {
    pub fn new(category: AlertCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
