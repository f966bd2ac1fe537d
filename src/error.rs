//! Error types for the daily summary pipeline.

use thiserror::Error;

/// Errors that can abort a summary run or skip a derived metric.
///
/// `IncompleteWindow` and `BatchRead` are fatal: a partial merge would be
/// indistinguishable from a complete daily summary, so the run stops before
/// any output is written. `TimestampParse` is recoverable and only means the
/// STD delta metric stays unset for that one event.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(
        "incomplete window for {date}: expected {expected} hourly batches, found {}; missing hours: {}",
        .found.len(),
        .missing.join(", ")
    )]
    IncompleteWindow {
        date: String,
        expected: usize,
        found: Vec<String>,
        missing: Vec<String>,
    },

    #[error("failed to read batch {path}")]
    BatchRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized timestamp format: {0:?}")]
    TimestampParse(String),

    #[error("invalid target date {0:?}, expected YYYYMMDD")]
    InvalidDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SummaryError>;
