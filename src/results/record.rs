//! Epoch Record - one per-epoch statistics line of a run log

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which pass an epoch record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Training pass.
    Train,
    /// Validation pass; the trainer logs these as `"test"`.
    #[serde(alias = "test")]
    Validation,
}

impl Mode {
    /// Lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed log line.
///
/// Required fields are `mode`, `acc`, `sender_entropy` and `length`; any
/// other fields the trainer logs (`loss`, `epoch`, ...) are ignored. The
/// epoch index is the record's position within its mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    mode: Mode,
    #[serde(rename = "acc")]
    accuracy: f64,
    sender_entropy: f64,
    #[serde(rename = "length")]
    message_length: f64,
}

impl EpochRecord {
    /// Build a record directly (mostly for tests and tooling).
    #[must_use]
    pub const fn new(mode: Mode, accuracy: f64, sender_entropy: f64, message_length: f64) -> Self {
        Self {
            mode,
            accuracy,
            sender_entropy,
            message_length,
        }
    }

    /// Pass the record came from.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Accuracy for the epoch.
    #[must_use]
    pub const fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Mean sender entropy for the epoch.
    #[must_use]
    pub const fn sender_entropy(&self) -> f64 {
        self.sender_entropy
    }

    /// Mean message length for the epoch.
    #[must_use]
    pub const fn message_length(&self) -> f64 {
        self.message_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_line() {
        let line = r#"{"loss": 2.31, "acc": 0.25, "sender_entropy": 1.5, "length": 3.0, "mode": "train", "epoch": 1}"#;
        let record: EpochRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.mode(), Mode::Train);
        assert!((record.accuracy() - 0.25).abs() < f64::EPSILON);
        assert!((record.message_length() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_test_mode_is_validation() {
        let line = r#"{"acc": 1, "sender_entropy": 0, "length": 2, "mode": "test"}"#;
        let record: EpochRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.mode(), Mode::Validation);
    }

    #[test]
    fn test_missing_field_rejected() {
        let line = r#"{"acc": 0.5, "length": 2, "mode": "train"}"#;
        assert!(serde_json::from_str::<EpochRecord>(line).is_err());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let line = r#"{"acc": 0.5, "sender_entropy": 0, "length": 2, "mode": "eval"}"#;
        assert!(serde_json::from_str::<EpochRecord>(line).is_err());
    }
}
