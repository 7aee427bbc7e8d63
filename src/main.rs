//! `sum-game` command line: dataset generation and results aggregation
//!
//! ```text
//! sum-game generate  [--config FILE] [--out DIR] [--range N] [--train N]
//!                    [--dev N] [--test N] [--holdout] [--sampled] [--seed N]
//! sum-game aggregate --results-dir DIR [--config FILE]
//!                    [--exclude-failed-runs] [--running-mean] [--top K]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sum_game_pipeline::config::{AggregatorConfig, GeneratorConfig, MergePolicy, Strategy};
use sum_game_pipeline::dataset::DatasetGenerator;
use sum_game_pipeline::results::{aggregate_results_dir, Mode};

/// Dataset generation and results aggregation for the integer-sum game.
#[derive(Parser, Debug)]
#[command(name = "sum-game", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate train/dev/test partitions and a manifest
    Generate(GenerateArgs),

    /// Merge a directory of run logs into ranked summaries
    Aggregate(AggregateArgs),
}

// Flags override the values loaded from `--config`.
#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON generator config to start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the partition files and manifest
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Exclusive upper bound of each operand
    #[arg(long)]
    range: Option<u32>,

    /// Requested train size (sampled strategy only)
    #[arg(long)]
    train: Option<usize>,

    /// Dev size
    #[arg(long)]
    dev: Option<usize>,

    /// Test size
    #[arg(long)]
    test: Option<usize>,

    /// Keep every dev/test pair, in either order, out of train
    #[arg(long)]
    holdout: bool,

    /// Draw pairs with replacement instead of enumerating the space
    #[arg(long)]
    sampled: bool,

    /// RNG seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,
}

impl GenerateArgs {
    fn generator_config(&self) -> anyhow::Result<GeneratorConfig> {
        let base = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)
                .with_context(|| format!("loading generator config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        let mut builder = base.into_builder();
        if let Some(range) = self.range {
            builder = builder.input_range(range);
        }
        if let Some(n_train) = self.train {
            builder = builder.n_train(n_train);
        }
        if let Some(n_dev) = self.dev {
            builder = builder.n_dev(n_dev);
        }
        if let Some(n_test) = self.test {
            builder = builder.n_test(n_test);
        }
        if self.holdout {
            builder = builder.holdout_pairs(true);
        }
        if self.sampled {
            builder = builder.strategy(Strategy::Sampled);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        let config = builder.build()?;

        if self.train.is_some() && config.strategy() == Strategy::Exhaustive {
            bail!("--train only applies to the sampled strategy; exhaustive mode trains on the remainder of the pair space");
        }
        Ok(config)
    }
}

// Flags override the values loaded from `--config`.
#[derive(Args, Debug)]
struct AggregateArgs {
    /// Directory holding the run logs; summaries are written here too
    #[arg(long)]
    results_dir: PathBuf,

    /// JSON aggregator config to start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop runs whose best train accuracy is at or below the threshold
    #[arg(long)]
    exclude_failed_runs: bool,

    /// Merge reruns with a count-weighted mean instead of pairwise
    #[arg(long)]
    running_mean: bool,

    /// Configs to print, by dev accuracy; 0 prints none
    #[arg(long, default_value_t = 5)]
    top: usize,
}

impl AggregateArgs {
    fn aggregator_config(&self) -> anyhow::Result<AggregatorConfig> {
        let mut builder = match &self.config {
            Some(path) => AggregatorConfig::from_json_file(path)
                .with_context(|| format!("loading aggregator config {}", path.display()))?
                .into_builder(),
            None => AggregatorConfig::builder(),
        };
        if self.exclude_failed_runs {
            builder = builder.exclude_failed_runs(true);
        }
        if self.running_mean {
            builder = builder.merge_policy(MergePolicy::RunningMean);
        }
        Ok(builder.build()?)
    }
}

impl Cli {
    fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Generate(args) => run_generate(&args),
            Commands::Aggregate(args) => run_aggregate(&args),
        }
    }
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let config = args.generator_config()?;
    let dataset = DatasetGenerator::new(config)?.generate();
    let artifacts = dataset.write_to_dir(&args.out)?;

    info!(
        train = %artifacts.train.display(),
        dev = %artifacts.dev.display(),
        test = %artifacts.test.display(),
        manifest = %artifacts.manifest.display(),
        "dataset written"
    );
    Ok(())
}

fn run_aggregate(args: &AggregateArgs) -> anyhow::Result<()> {
    let config = args.aggregator_config()?;
    let dir = &args.results_dir;
    let (ranked, report, artifacts) = aggregate_results_dir(dir, config)
        .with_context(|| format!("aggregating {}", dir.display()))?;

    println!(
        "{} logs, {} merged, {} excluded",
        report.files, report.merged, report.excluded
    );
    println!("train summary: {}", artifacts.train.display());
    println!("dev summary:   {}", artifacts.validation.display());

    if args.top > 0 && !ranked.validation().is_empty() {
        println!("\ntop {} configs by dev accuracy:", args.top);
        for (rank, (key, summary)) in ranked
            .top_k(Mode::Validation, args.top)?
            .into_iter()
            .enumerate()
        {
            println!(
                "  {:>2}. {:<16} max_acc={:.4} epoch={:.1} entropy={:.3} len={:.2} runs={}",
                rank + 1,
                key.to_string(),
                summary.max_accuracy(),
                summary.max_accuracy_epoch(),
                summary.mean_sender_entropy(),
                summary.mean_message_length(),
                summary.runs()
            );
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Cli::parse().run()
}
