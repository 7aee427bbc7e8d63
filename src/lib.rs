//! # Sum-Game Pipeline: Datasets and Results for the Integer-Sum Game
//!
//! Tooling around an emergent-communication experiment in which a sender
//! sees two integers `a, b ∈ [0, range)` and a receiver must recover
//! `a + b` from the sender's message. The training loop lives elsewhere;
//! this crate covers both ends of it:
//!
//! - [`dataset`]: generate `train`/`dev`/`test` partitions, optionally
//!   holding out every unordered pair seen in evaluation from training.
//! - [`reader`]: load partition files into one-hot encoded datasets.
//! - [`results`]: parse a campaign's run logs and merge reruns of the same
//!   configuration into ranked per-config summaries.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sum_game_pipeline::config::{AggregatorConfig, GeneratorConfig};
//! use sum_game_pipeline::dataset::DatasetGenerator;
//! use sum_game_pipeline::results::aggregate_results_dir;
//!
//! let config = GeneratorConfig::builder().input_range(50).seed(7).build()?;
//! DatasetGenerator::new(config)?.generate().write_to_dir("data")?;
//!
//! let (ranked, report, _) = aggregate_results_dir("runs", AggregatorConfig::default())?;
//! println!("{} runs over {} configs", report.merged, ranked.train().len());
//! # Ok::<(), sum_game_pipeline::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod ranking;
pub mod reader;
pub mod results;

pub use error::{Error, Result};
