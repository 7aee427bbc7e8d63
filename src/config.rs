//! Immutable configuration records for the generator and the aggregator
//!
//! Every recognised option is a named field with a default. Configs are
//! built once (from a builder or a JSON file), validated, and then handed
//! by reference to the component that consumes them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Largest operand range whose sums still fit in a `u32`.
pub const MAX_INPUT_RANGE: u32 = u32::MAX / 2 + 1;

/// Largest pair space exhaustive mode will enumerate (`input_range` 4096).
pub const MAX_EXHAUSTIVE_PAIRS: u64 = 1 << 24;

/// How the generator draws example pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Enumerate all `range²` ordered pairs, shuffle, slice into partitions.
    #[default]
    Exhaustive,
    /// Draw each partition independently with replacement.
    Sampled,
}

impl Strategy {
    /// Short name used in artifact file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::Sampled => "sampled",
        }
    }
}

/// What sampled mode does with a train candidate that collides with a
/// held-out pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum Rejection {
    /// Drop the candidate; the train partition may come out short.
    #[default]
    Drop,
    /// Redraw until `n_train` is reached or `max_attempts` draws were made.
    Resample {
        /// Total draw budget for the train partition.
        max_attempts: usize,
    },
}

/// Dataset generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    input_range: u32,
    n_train: usize,
    n_dev: usize,
    n_test: usize,
    holdout_pairs: bool,
    strategy: Strategy,
    rejection: Rejection,
    seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_range: 1000,
            n_train: 10_000,
            n_dev: 1000,
            n_test: 1000,
            holdout_pairs: false,
            strategy: Strategy::Exhaustive,
            rejection: Rejection::Drop,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Start from the defaults.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Builder seeded with this config, for overriding single fields.
    #[must_use]
    pub const fn into_builder(self) -> GeneratorConfigBuilder {
        GeneratorConfigBuilder { config: self }
    }

    /// Load a config from a JSON file; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`GeneratorConfig::validate`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Exclusive upper bound of each operand.
    #[must_use]
    pub const fn input_range(&self) -> u32 {
        self.input_range
    }

    /// Requested train size (sampled mode only).
    #[must_use]
    pub const fn n_train(&self) -> usize {
        self.n_train
    }

    /// Requested dev size.
    #[must_use]
    pub const fn n_dev(&self) -> usize {
        self.n_dev
    }

    /// Requested test size.
    #[must_use]
    pub const fn n_test(&self) -> usize {
        self.n_test
    }

    /// Whether dev/test pairs are held out of train in either operand order.
    #[must_use]
    pub const fn holdout_pairs(&self) -> bool {
        self.holdout_pairs
    }

    /// Generation strategy.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Rejection policy for sampled holdout collisions.
    #[must_use]
    pub const fn rejection(&self) -> Rejection {
        self.rejection
    }

    /// RNG seed, if generation should be reproducible.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of distinct ordered pairs in `[0, range)²`.
    #[must_use]
    pub fn pair_space(&self) -> u64 {
        u64::from(self.input_range) * u64::from(self.input_range)
    }

    /// Check the options against each other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the range is empty or too large for
    /// `u32` sums, if exhaustive mode would enumerate more than
    /// [`MAX_EXHAUSTIVE_PAIRS`] pairs or asks for more held-out examples than
    /// there are pairs, or if the resample budget is zero.
    pub fn validate(&self) -> Result<()> {
        if self.input_range == 0 {
            return Err(Error::InvalidConfig(
                "input_range must be at least 1".to_string(),
            ));
        }
        if self.input_range > MAX_INPUT_RANGE {
            return Err(Error::InvalidConfig(format!(
                "input_range {} exceeds the maximum of {MAX_INPUT_RANGE}",
                self.input_range
            )));
        }

        if self.strategy == Strategy::Exhaustive {
            if self.pair_space() > MAX_EXHAUSTIVE_PAIRS {
                return Err(Error::InvalidConfig(format!(
                    "exhaustive mode would enumerate {} pairs for input_range {}, above the limit of {MAX_EXHAUSTIVE_PAIRS}; use the sampled strategy",
                    self.pair_space(),
                    self.input_range
                )));
            }
            let held_out = self.n_test as u64 + self.n_dev as u64;
            if held_out > self.pair_space() {
                return Err(Error::InvalidConfig(format!(
                    "n_test + n_dev = {held_out} exceeds the {} pairs available for input_range {}",
                    self.pair_space(),
                    self.input_range
                )));
            }
        }

        if let Rejection::Resample { max_attempts: 0 } = self.rejection {
            return Err(Error::InvalidConfig(
                "resample max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for `GeneratorConfig`.
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Set the operand range.
    #[must_use]
    pub const fn input_range(mut self, input_range: u32) -> Self {
        self.config.input_range = input_range;
        self
    }

    /// Set the requested train size.
    #[must_use]
    pub const fn n_train(mut self, n_train: usize) -> Self {
        self.config.n_train = n_train;
        self
    }

    /// Set the dev size.
    #[must_use]
    pub const fn n_dev(mut self, n_dev: usize) -> Self {
        self.config.n_dev = n_dev;
        self
    }

    /// Set the test size.
    #[must_use]
    pub const fn n_test(mut self, n_test: usize) -> Self {
        self.config.n_test = n_test;
        self
    }

    /// Enable or disable pair holdout.
    #[must_use]
    pub const fn holdout_pairs(mut self, holdout_pairs: bool) -> Self {
        self.config.holdout_pairs = holdout_pairs;
        self
    }

    /// Set the generation strategy.
    #[must_use]
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the rejection policy.
    #[must_use]
    pub const fn rejection(mut self, rejection: Rejection) -> Self {
        self.config.rejection = rejection;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate and build the config.
    ///
    /// # Errors
    ///
    /// See [`GeneratorConfig::validate`].
    pub fn build(self) -> Result<GeneratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// How a new run is folded into an existing per-config aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// `(aggregate + run) / 2`: the newest run weighs as much as all
    /// earlier runs together, so the result depends on file order.
    #[default]
    PairwiseMean,
    /// Count-weighted running mean over every merged run.
    RunningMean,
}

/// Results aggregation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    exclude_failed_runs: bool,
    failure_threshold: f64,
    merge_policy: MergePolicy,
    skip_marker: String,
    train_summary_file: String,
    validation_summary_file: String,
    indent: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            exclude_failed_runs: false,
            failure_threshold: 0.10,
            merge_policy: MergePolicy::PairwiseMean,
            skip_marker: "stats".to_string(),
            train_summary_file: "train_summary_stats.txt".to_string(),
            validation_summary_file: "dev_summary_stats.txt".to_string(),
            indent: 6,
        }
    }
}

impl AggregatorConfig {
    /// Start from the defaults.
    #[must_use]
    pub fn builder() -> AggregatorConfigBuilder {
        AggregatorConfigBuilder::default()
    }

    /// Builder seeded with this config, for overriding single fields.
    #[must_use]
    pub fn into_builder(self) -> AggregatorConfigBuilder {
        AggregatorConfigBuilder { config: self }
    }

    /// Load a config from a JSON file; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`AggregatorConfig::validate`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether failed runs are dropped before merging.
    #[must_use]
    pub const fn exclude_failed_runs(&self) -> bool {
        self.exclude_failed_runs
    }

    /// A run fails when its best train accuracy is at or below this value.
    #[must_use]
    pub const fn failure_threshold(&self) -> f64 {
        self.failure_threshold
    }

    /// Merge policy for reruns of one configuration.
    #[must_use]
    pub const fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Files whose name contains this marker are not logs.
    #[must_use]
    pub fn skip_marker(&self) -> &str {
        &self.skip_marker
    }

    /// Output file name for the train summary.
    #[must_use]
    pub fn train_summary_file(&self) -> &str {
        &self.train_summary_file
    }

    /// Output file name for the validation summary.
    #[must_use]
    pub fn validation_summary_file(&self) -> &str {
        &self.validation_summary_file
    }

    /// Indentation width of the summary files.
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    /// Check the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a non-finite threshold, empty
    /// output names, or output names the log scan would pick up as logs.
    pub fn validate(&self) -> Result<()> {
        if !self.failure_threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "failure_threshold must be finite, got {}",
                self.failure_threshold
            )));
        }

        for name in [&self.train_summary_file, &self.validation_summary_file] {
            if name.is_empty() {
                return Err(Error::InvalidConfig(
                    "summary file names must not be empty".to_string(),
                ));
            }
            if self.skip_marker.is_empty() || !name.contains(&self.skip_marker) {
                return Err(Error::InvalidConfig(format!(
                    "summary file {name} must contain the skip marker {:?} so reruns do not parse it as a log",
                    self.skip_marker
                )));
            }
        }

        Ok(())
    }
}

/// Builder for `AggregatorConfig`.
#[derive(Debug, Default)]
pub struct AggregatorConfigBuilder {
    config: AggregatorConfig,
}

impl AggregatorConfigBuilder {
    /// Drop runs whose best train accuracy does not clear the threshold.
    #[must_use]
    pub const fn exclude_failed_runs(mut self, exclude: bool) -> Self {
        self.config.exclude_failed_runs = exclude;
        self
    }

    /// Set the failure threshold.
    #[must_use]
    pub const fn failure_threshold(mut self, threshold: f64) -> Self {
        self.config.failure_threshold = threshold;
        self
    }

    /// Set the merge policy.
    #[must_use]
    pub const fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.config.merge_policy = policy;
        self
    }

    /// Set the marker that identifies non-log files.
    #[must_use]
    pub fn skip_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.skip_marker = marker.into();
        self
    }

    /// Set the train summary file name.
    #[must_use]
    pub fn train_summary_file(mut self, name: impl Into<String>) -> Self {
        self.config.train_summary_file = name.into();
        self
    }

    /// Set the validation summary file name.
    #[must_use]
    pub fn validation_summary_file(mut self, name: impl Into<String>) -> Self {
        self.config.validation_summary_file = name.into();
        self
    }

    /// Set the indentation width of the summary files.
    #[must_use]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.config.indent = indent;
        self
    }

    /// Validate and build the config.
    ///
    /// # Errors
    ///
    /// See [`AggregatorConfig::validate`].
    pub fn build(self) -> Result<AggregatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert_eq!(config.input_range(), 1000);
        assert_eq!(config.strategy(), Strategy::Exhaustive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_exhaustive_rejects_oversized_holdout() {
        let result = GeneratorConfig::builder()
            .input_range(3)
            .n_test(5)
            .n_dev(5)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_exhaustive_rejects_unenumerable_range() {
        let result = GeneratorConfig::builder()
            .input_range(100_000)
            .n_test(10)
            .n_dev(10)
            .build();
        let Err(Error::InvalidConfig(message)) = &result else {
            panic!("expected InvalidConfig, got {result:?}");
        };
        assert!(message.contains("sampled strategy"));
    }

    #[test]
    fn test_exhaustive_range_at_pair_limit() {
        let at_limit = GeneratorConfig::builder().input_range(4096).build();
        assert!(at_limit.is_ok());
        let above = GeneratorConfig::builder().input_range(4097).build();
        assert!(matches!(above, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_sampled_large_range_accepted() {
        let config = GeneratorConfig::builder()
            .input_range(100_000)
            .strategy(Strategy::Sampled)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_exhaustive_accepts_full_space() {
        let config = GeneratorConfig::builder()
            .input_range(3)
            .n_test(4)
            .n_dev(5)
            .build()
            .unwrap();
        assert_eq!(config.pair_space(), 9);
    }

    #[test]
    fn test_sampled_ignores_pair_space() {
        let result = GeneratorConfig::builder()
            .input_range(2)
            .n_test(50)
            .n_dev(50)
            .strategy(Strategy::Sampled)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_range_rejected() {
        let result = GeneratorConfig::builder().input_range(0).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_resample_budget_rejected() {
        let result = GeneratorConfig::builder()
            .strategy(Strategy::Sampled)
            .rejection(Rejection::Resample { max_attempts: 0 })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_generator_json_partial_fields() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"input_range": 20, "strategy": "sampled"}"#).unwrap();
        assert_eq!(config.input_range(), 20);
        assert_eq!(config.strategy(), Strategy::Sampled);
        assert_eq!(config.n_dev(), 1000);
        assert_eq!(config.rejection(), Rejection::Drop);
    }

    #[test]
    fn test_rejection_json_tagged() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{"rejection": {"policy": "resample", "max_attempts": 500}}"#,
        )
        .unwrap();
        assert_eq!(config.rejection(), Rejection::Resample { max_attempts: 500 });
    }

    #[test]
    fn test_aggregator_defaults() {
        let config = AggregatorConfig::default();
        assert!(!config.exclude_failed_runs());
        assert!((config.failure_threshold() - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.merge_policy(), MergePolicy::PairwiseMean);
        assert_eq!(config.indent(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_aggregator_rejects_summary_name_without_marker() {
        let result = AggregatorConfig::builder()
            .train_summary_file("train_summary.txt")
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_aggregator_rejects_nan_threshold() {
        let result = AggregatorConfig::builder()
            .failure_threshold(f64::NAN)
            .build();
        assert!(result.is_err());
    }
}
