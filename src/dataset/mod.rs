//! Dataset generation for the integer-sum game
//!
//! Produces `train`, `dev` and `test` partitions of `(a, b, a + b)`
//! examples with `a, b ∈ [0, range)`.
//!
//! ## Strategies
//!
//! ```text
//! Exhaustive: [0,range)² ──shuffle──> | test | dev | train (remainder) |
//! Sampled:    test ← draw n_test,  dev ← draw n_dev,  train ← draw n_train
//!                                                       └─ holdout filter
//! ```
//!
//! With holdout enabled, a train example is rejected when its unordered
//! key `{a, b}` occurs in dev or test, so `(3, 7)` in test keeps both
//! `(3, 7)` and `(7, 3)` out of train.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sum_game_pipeline::config::GeneratorConfig;
//! use sum_game_pipeline::dataset::DatasetGenerator;
//!
//! let config = GeneratorConfig::builder()
//!     .input_range(100)
//!     .n_dev(500)
//!     .n_test(500)
//!     .holdout_pairs(true)
//!     .seed(42)
//!     .build()?;
//! let dataset = DatasetGenerator::new(config)?.generate();
//! dataset.write_to_dir("data")?;
//! # Ok::<(), sum_game_pipeline::Error>(())
//! ```

mod artifact;
mod example;
mod generator;
mod partition;

pub use artifact::{DatasetArtifacts, DatasetManifest, GeneratedDataset, ManifestFiles};
pub use example::{Example, UnorderedKey};
pub use generator::DatasetGenerator;
pub use partition::{Partition, PartitionKind};
