//! Results aggregation over a campaign of training runs
//!
//! Each run writes one log named `seed-<s>_vocab-<v>_maxlen-<m>_ec-<e>...`.
//! Runs sharing `(v, m, e)` are reruns of one config and are merged into a
//! single summary per mode:
//!
//! ```text
//! log ──split_sections──> records ──RunSummary──┬─> train table ──┐
//!                                               └─> dev table ────┴─> ranked JSON
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sum_game_pipeline::config::AggregatorConfig;
//! use sum_game_pipeline::results::{Mode, ResultsAggregator};
//!
//! let config = AggregatorConfig::builder().exclude_failed_runs(true).build()?;
//! let mut aggregator = ResultsAggregator::new(config)?;
//! aggregator.ingest_dir("runs")?;
//! let ranked = aggregator.finish();
//! ranked.write_to_dir("runs")?;
//! for (key, summary) in ranked.top_k(Mode::Validation, 3)? {
//!     println!("{key}: {:.3}", summary.max_accuracy());
//! }
//! # Ok::<(), sum_game_pipeline::Error>(())
//! ```

mod aggregator;
mod log_name;
mod parser;
mod record;
mod summary;

pub use aggregator::{
    aggregate_results_dir, AggregationReport, RankedResults, ResultsAggregator, RunOutcome,
    SummaryArtifacts,
};
pub use log_name::{ConfigKey, LogFileName};
pub use parser::{parse_log, split_sections, ParsedLog, EXPECTED_SECTIONS, SECTION_MARKERS};
pub use record::{EpochRecord, Mode};
pub use summary::{AggregateSummary, AggregateTable, RunSummary};
