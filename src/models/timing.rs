use indexmap::IndexMap;
use std::time::Duration;

/// Elapsed time per report section, kept in the order sections ran.
#[derive(Debug, Clone, Default)]
pub struct SectionTimings {
    sections: IndexMap<String, Duration>,
}

impl SectionTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-recording a label accumulates onto the existing entry.
    pub fn record(&mut self, label: &str, elapsed: Duration) {
        *self.sections.entry(label.to_string()).or_default() += elapsed;
    }

    pub fn get(&self, label: &str) -> Option<Duration> {
        self.sections.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.sections.iter().map(|(label, elapsed)| (label.as_str(), *elapsed))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order_and_accumulates() {
        let mut timings = SectionTimings::new();
        timings.record("Processes", Duration::from_millis(30));
        timings.record("Hardware", Duration::from_millis(5));
        timings.record("Processes", Duration::from_millis(20));

        let labels: Vec<&str> = timings.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Processes", "Hardware"]);
        assert_eq!(timings.get("Processes"), Some(Duration::from_millis(50)));
        assert_eq!(timings.len(), 2);
        assert!(timings.get("Network").is_none());
    }
}
