//! Error taxonomy for the cleaning pipeline.
//!
//! The orchestrator keys its per-day policy off these variants: `Config`
//! aborts before any day runs, `NotFound` skips the day, everything else
//! fails the day without stopping the range.

use thiserror::Error;

pub type CleanResult<T> = Result<T, CleanError>;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("configuration error: {0}")]
    Config(String),

    /// The day's input table is missing required columns. Schema drift is an
    /// upstream contract break, so the day is failed without retry.
    #[error("missing required columns: {missing:?}")]
    Schema { missing: Vec<String> },

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage error for '{path}': {message}")]
    Storage { path: String, message: String },

    #[error("table codec error: {0}")]
    Codec(#[from] csv::Error),

    #[error("report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

impl CleanError {
    pub fn storage(path: impl Into<String>, message: impl ToString) -> Self {
        CleanError::Storage {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
