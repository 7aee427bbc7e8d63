//! Run and aggregate summaries, and the per-config aggregate table

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{ConfigKey, EpochRecord};
use crate::config::MergePolicy;
use crate::ranking::{rank_by, SortOrder};

/// Summary of one run's records for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(rename = "max_acc")]
    max_accuracy: f64,
    #[serde(rename = "max_acc_index")]
    max_accuracy_epoch: usize,
    mean_sender_entropy: f64,
    #[serde(rename = "mean_message_len")]
    mean_message_length: f64,
}

impl RunSummary {
    /// Reduce a non-empty record sequence; `None` if it is empty.
    ///
    /// The best epoch is the first one reaching the maximum accuracy.
    #[must_use]
    pub fn from_records(records: &[EpochRecord]) -> Option<Self> {
        let first = records.first()?;
        let mut max_accuracy = first.accuracy();
        let mut max_accuracy_epoch = 0;
        let mut entropy_total = 0.0;
        let mut length_total = 0.0;

        for (epoch, record) in records.iter().enumerate() {
            if record.accuracy() > max_accuracy {
                max_accuracy = record.accuracy();
                max_accuracy_epoch = epoch;
            }
            entropy_total += record.sender_entropy();
            length_total += record.message_length();
        }

        #[allow(clippy::cast_precision_loss)]
        let n = records.len() as f64;
        Some(Self {
            max_accuracy,
            max_accuracy_epoch,
            mean_sender_entropy: entropy_total / n,
            mean_message_length: length_total / n,
        })
    }

    /// Best accuracy over all epochs.
    #[must_use]
    pub const fn max_accuracy(&self) -> f64 {
        self.max_accuracy
    }

    /// 0-based epoch of the best accuracy.
    #[must_use]
    pub const fn max_accuracy_epoch(&self) -> usize {
        self.max_accuracy_epoch
    }

    /// Mean sender entropy over all epochs.
    #[must_use]
    pub const fn mean_sender_entropy(&self) -> f64 {
        self.mean_sender_entropy
    }

    /// Mean message length over all epochs.
    #[must_use]
    pub const fn mean_message_length(&self) -> f64 {
        self.mean_message_length
    }
}

/// Merged summary of every run routed to one config and mode.
///
/// All fields are floats: averaging best-epoch indices across runs gives
/// fractional epochs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    #[serde(rename = "max_acc")]
    max_accuracy: f64,
    #[serde(rename = "max_acc_index")]
    max_accuracy_epoch: f64,
    mean_sender_entropy: f64,
    #[serde(rename = "mean_message_len")]
    mean_message_length: f64,
    runs: usize,
}

impl AggregateSummary {
    /// Aggregate holding a single run, unchanged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_run(run: &RunSummary) -> Self {
        Self {
            max_accuracy: run.max_accuracy,
            max_accuracy_epoch: run.max_accuracy_epoch as f64,
            mean_sender_entropy: run.mean_sender_entropy,
            mean_message_length: run.mean_message_length,
            runs: 1,
        }
    }

    /// Fold one more run into the aggregate.
    ///
    /// `PairwiseMean` sets every field to `(current + run) / 2`;
    /// `RunningMean` keeps the exact mean over all merged runs.
    #[allow(clippy::cast_precision_loss)]
    pub fn merge(&mut self, run: &RunSummary, policy: MergePolicy) {
        let weight = match policy {
            MergePolicy::PairwiseMean => 0.5,
            MergePolicy::RunningMean => 1.0 / (self.runs as f64 + 1.0),
        };
        let step = |current: f64, value: f64| current + (value - current) * weight;

        self.max_accuracy = step(self.max_accuracy, run.max_accuracy);
        self.max_accuracy_epoch = step(self.max_accuracy_epoch, run.max_accuracy_epoch as f64);
        self.mean_sender_entropy = step(self.mean_sender_entropy, run.mean_sender_entropy);
        self.mean_message_length = step(self.mean_message_length, run.mean_message_length);
        self.runs += 1;
    }

    /// Merged best accuracy.
    #[must_use]
    pub const fn max_accuracy(&self) -> f64 {
        self.max_accuracy
    }

    /// Merged best-epoch index.
    #[must_use]
    pub const fn max_accuracy_epoch(&self) -> f64 {
        self.max_accuracy_epoch
    }

    /// Merged mean sender entropy.
    #[must_use]
    pub const fn mean_sender_entropy(&self) -> f64 {
        self.mean_sender_entropy
    }

    /// Merged mean message length.
    #[must_use]
    pub const fn mean_message_length(&self) -> f64 {
        self.mean_message_length
    }

    /// Number of runs merged in.
    #[must_use]
    pub const fn runs(&self) -> usize {
        self.runs
    }
}

/// Aggregates keyed by config, remembering first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct AggregateTable {
    index: FxHashMap<ConfigKey, usize>,
    entries: Vec<(ConfigKey, AggregateSummary)>,
}

impl AggregateTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a run into its config's aggregate, creating it on first sight.
    pub fn merge(&mut self, key: &ConfigKey, run: &RunSummary, policy: MergePolicy) {
        if let Some(&slot) = self.index.get(key) {
            self.entries[slot].1.merge(run, policy);
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key.clone(), AggregateSummary::from_run(run)));
        }
    }

    /// Aggregate for `key`, if any run was merged.
    #[must_use]
    pub fn get(&self, key: &ConfigKey) -> Option<&AggregateSummary> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Number of configs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no run was merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by best accuracy, descending; ties keep encounter order.
    #[must_use]
    pub fn into_ranked(self) -> Vec<(ConfigKey, AggregateSummary)> {
        let mut entries = self.entries;
        rank_by(&mut entries, |(_, summary)| summary.max_accuracy(), SortOrder::Descending);
        entries
    }
}
