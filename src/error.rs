use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed input that zero-filling cannot repair. Fatal at startup.
    #[error("{source_name} line {line}: {message}")]
    Parse {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("country not found: {0}")]
    NotFound(String),

    #[error("invalid metric '{0}' (expected Confirmed, Deaths, Recovered or Active)")]
    InvalidMetric(String),

    #[error("unknown control: {0}")]
    UnknownControl(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl DashboardError {
    pub fn parse(source_name: &str, line: u64, message: impl Into<String>) -> Self {
        DashboardError::Parse {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}
