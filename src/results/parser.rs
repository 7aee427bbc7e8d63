//! Run log parsing: sectioning and per-epoch record extraction
//!
//! A run log looks like
//!
//! ```text
//! <banner line>
//! <banner line>
//! {"mode": "train", "acc": ..., ...}     ┐
//! {"mode": "test", "acc": ..., ...}      ├ epoch records, one per line
//! ...                                    ┘
//! INPUTS ... LABELS ... MESSAGES ... OUTPUTS ...
//! ```
//!
//! Only the part before the first marker is parsed; the validation dump
//! after it must be present but is not interpreted.

use super::{EpochRecord, Mode};
use crate::{Error, Result};

/// Markers introducing the validation-dump sections, in file order.
pub const SECTION_MARKERS: [&str; 4] = ["INPUTS", "LABELS", "MESSAGES", "OUTPUTS"];

/// Number of parts a well-formed log splits into.
pub const EXPECTED_SECTIONS: usize = SECTION_MARKERS.len() + 1;

/// Banner lines preceding the epoch records.
const HEADER_LINES: usize = 2;

/// Epoch records of one run, split by mode in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    train: Vec<EpochRecord>,
    validation: Vec<EpochRecord>,
}

impl ParsedLog {
    /// Train records; index = epoch.
    #[must_use]
    pub fn train(&self) -> &[EpochRecord] {
        &self.train
    }

    /// Validation records; index = epoch.
    #[must_use]
    pub fn validation(&self) -> &[EpochRecord] {
        &self.validation
    }

    /// Records of one mode.
    #[must_use]
    pub fn records(&self, mode: Mode) -> &[EpochRecord] {
        match mode {
            Mode::Train => &self.train,
            Mode::Validation => &self.validation,
        }
    }
}

/// Split `content` at every occurrence of any section marker.
///
/// Markers are removed; the parts between them are returned in order.
#[must_use]
pub fn split_sections(content: &str) -> Vec<&str> {
    let mut parts = Vec::with_capacity(EXPECTED_SECTIONS);
    let mut rest = content;

    loop {
        let next = SECTION_MARKERS
            .iter()
            .filter_map(|marker| rest.find(marker).map(|at| (at, marker.len())))
            .min_by_key(|&(at, _)| at);

        match next {
            Some((at, len)) => {
                parts.push(&rest[..at]);
                rest = &rest[at + len..];
            }
            None => {
                parts.push(rest);
                return parts;
            }
        }
    }
}

/// Parse a run log into per-mode epoch records.
///
/// `source` names the log in error messages.
///
/// # Errors
///
/// Returns [`Error::MalformedLog`] if the log does not split into exactly
/// five sections or a record line is not a valid epoch record.
pub fn parse_log(source: &str, content: &str) -> Result<ParsedLog> {
    let sections = split_sections(content);
    if sections.len() != EXPECTED_SECTIONS {
        return Err(Error::MalformedLog {
            path: source.to_string(),
            reason: format!(
                "expected {EXPECTED_SECTIONS} sections delimited by {}, found {}",
                SECTION_MARKERS.join("/"),
                sections.len()
            ),
        });
    }

    let lines: Vec<&str> = sections[0].split('\n').collect();
    // Drop the banner and the empty tail left by the newline before INPUTS.
    let body: &[&str] = if lines.len() > HEADER_LINES + 1 {
        &lines[HEADER_LINES..lines.len() - 1]
    } else {
        &[]
    };

    let mut parsed = ParsedLog::default();
    for (offset, line) in body.iter().enumerate() {
        let record: EpochRecord =
            serde_json::from_str(line.trim_end_matches('\r')).map_err(|e| Error::MalformedLog {
                path: source.to_string(),
                reason: format!("line {}: {e}", HEADER_LINES + offset + 1),
            })?;
        match record.mode() {
            Mode::Train => parsed.train.push(record),
            Mode::Validation => parsed.validation.push(record),
        }
    }

    Ok(parsed)
}
