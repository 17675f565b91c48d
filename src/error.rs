use std::io;
use thiserror::Error;

/// Failure of a single metric source. The orchestrator turns it into a
/// placeholder section instead of aborting the run.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("{category}: {source}")]
    Io {
        category: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{category}: {reason}")]
    Unavailable {
        category: &'static str,
        reason: String,
    },
}

impl CollectionError {
    pub fn io(category: &'static str, source: io::Error) -> Self {
        Self::Io { category, source }
    }

    pub fn unavailable(category: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            category,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { category, .. } | Self::Unavailable { category, .. } => category,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("table '{table}' row {row} has {found} cells, expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("failed to format report")]
    Format(#[from] std::fmt::Error),
}
