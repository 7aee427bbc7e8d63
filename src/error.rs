//! Error types for the sum-game pipeline
//!
//! Every failure carries the offending file and a reason, so a campaign
//! that aborts points straight at the input that needs fixing.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected before any work was done
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset row with wrong arity, non-integer field or out-of-range value
    #[error("Malformed dataset row {line} in {path}: {reason}")]
    MalformedRow {
        /// Dataset file
        path: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the row
        reason: String,
    },

    /// Log file whose sections or records could not be parsed
    #[error("Malformed log file {path}: {reason}")]
    MalformedLog {
        /// Log file
        path: String,
        /// What was wrong with the file
        reason: String,
    },

    /// Log file name without the `seed-_vocab-_maxlen-_ec-` prefix
    #[error("Invalid log file name {name}: {reason}")]
    InvalidLogName {
        /// File name as found on disk
        name: String,
        /// Which token failed
        reason: String,
    },

    /// No epochs recorded for one of the modes
    #[error("No {mode} epochs recorded in {path}")]
    EmptySequence {
        /// Log file
        path: String,
        /// Mode with no records
        mode: String,
    },

    /// Invalid argument to an API call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
