//! Results aggregator - folds run logs into ranked per-config summaries

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use super::{parse_log, AggregateSummary, AggregateTable, ConfigKey, LogFileName, Mode, RunSummary};
use crate::config::AggregatorConfig;
use crate::ranking::{top_k, SortOrder};
use crate::{Error, Result};

/// What happened to one ingested run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Both modes were merged into the config's aggregates.
    Merged {
        /// Config the run belongs to.
        key: ConfigKey,
        /// Seed of the run.
        seed: u64,
    },
    /// The run failed the train-accuracy filter and contributed nothing.
    Excluded {
        /// Config the run belongs to.
        key: ConfigKey,
        /// Seed of the run.
        seed: u64,
        /// Best train accuracy that failed the threshold.
        train_max_accuracy: f64,
    },
}

/// Counts from one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Log files parsed.
    pub files: usize,
    /// Runs merged into aggregates.
    pub merged: usize,
    /// Runs dropped by the failure filter.
    pub excluded: usize,
}

/// Stateful aggregation over a campaign's run logs.
///
/// Logs are ingested one at a time; any malformed log aborts the pass with
/// an error and leaves no partial output on disk.
#[derive(Debug, Clone)]
pub struct ResultsAggregator {
    config: AggregatorConfig,
    train: AggregateTable,
    validation: AggregateTable,
    report: AggregationReport,
}

impl ResultsAggregator {
    /// Create an aggregator with empty tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the config does not validate.
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            train: AggregateTable::new(),
            validation: AggregateTable::new(),
            report: AggregationReport::default(),
        })
    }

    /// The aggregator's config.
    #[must_use]
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Counts so far.
    #[must_use]
    pub const fn report(&self) -> AggregationReport {
        self.report
    }

    /// Aggregates so far for one mode.
    #[must_use]
    pub const fn table(&self, mode: Mode) -> &AggregateTable {
        match mode {
            Mode::Train => &self.train,
            Mode::Validation => &self.validation,
        }
    }

    /// Ingest one run log given its file name and content.
    ///
    /// # Errors
    ///
    /// Returns an error if the name does not carry a config key, the log is
    /// malformed, or either mode has no records. Nothing is merged on error.
    pub fn ingest(&mut self, file_name: &str, content: &str) -> Result<RunOutcome> {
        let name = LogFileName::parse(file_name)?;
        let parsed = parse_log(file_name, content)?;
        let summarize = |mode: Mode| {
            RunSummary::from_records(parsed.records(mode)).ok_or_else(|| Error::EmptySequence {
                path: file_name.to_string(),
                mode: mode.to_string(),
            })
        };
        let train = summarize(Mode::Train)?;
        let validation = summarize(Mode::Validation)?;

        self.report.files += 1;
        let seed = name.seed();
        let key = name.into_key();

        if self.config.exclude_failed_runs()
            && train.max_accuracy() <= self.config.failure_threshold()
        {
            self.report.excluded += 1;
            warn!(
                file = file_name,
                train_max_acc = train.max_accuracy(),
                threshold = self.config.failure_threshold(),
                "excluding failed run"
            );
            return Ok(RunOutcome::Excluded {
                key,
                seed,
                train_max_accuracy: train.max_accuracy(),
            });
        }

        let policy = self.config.merge_policy();
        self.train.merge(&key, &train, policy);
        self.validation.merge(&key, &validation, policy);
        self.report.merged += 1;
        debug!(
            file = file_name,
            key = %key,
            train_max_acc = train.max_accuracy(),
            validation_max_acc = validation.max_accuracy(),
            "merged run"
        );

        Ok(RunOutcome::Merged { key, seed })
    }

    /// Read and ingest one log file.
    ///
    /// # Errors
    ///
    /// See [`ResultsAggregator::ingest`]; also fails if the file cannot be
    /// read or its name is not UTF-8.
    pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P) -> Result<RunOutcome> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidLogName {
                name: path.display().to_string(),
                reason: "file name is missing or not UTF-8".to_string(),
            })?;
        let content = fs::read_to_string(path)?;
        self.ingest(file_name, &content)
    }

    /// Run logs in `dir`: regular files whose name lacks the skip marker,
    /// in file-name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn log_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if name.to_string_lossy().contains(self.config.skip_marker()) {
                continue;
            }
            files.push(entry.path());
        }
        files.sort();
        Ok(files)
    }

    /// Ingest every log in `dir`.
    ///
    /// # Errors
    ///
    /// Aborts on the first unreadable or malformed log.
    pub fn ingest_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<AggregationReport> {
        let files = self.log_files(dir.as_ref())?;
        info!(dir = %dir.as_ref().display(), logs = files.len(), "aggregating run logs");
        for path in &files {
            self.ingest_file(path)?;
        }
        Ok(self.report)
    }

    /// Finalize: rank each mode's aggregates by best accuracy.
    #[must_use]
    pub fn finish(self) -> RankedResults {
        RankedResults {
            train: self.train.into_ranked(),
            validation: self.validation.into_ranked(),
            indent: self.config.indent(),
            train_file: self.config.train_summary_file().to_string(),
            validation_file: self.config.validation_summary_file().to_string(),
        }
    }
}

/// Aggregate one results directory and write both summaries into it.
///
/// # Errors
///
/// Returns the first error from listing, parsing or writing.
pub fn aggregate_results_dir<P: AsRef<Path>>(
    dir: P,
    config: AggregatorConfig,
) -> Result<(RankedResults, AggregationReport, SummaryArtifacts)> {
    let dir = dir.as_ref();
    let mut aggregator = ResultsAggregator::new(config)?;
    let report = aggregator.ingest_dir(dir)?;
    let ranked = aggregator.finish();
    let artifacts = ranked.write_to_dir(dir)?;
    info!(
        files = report.files,
        merged = report.merged,
        excluded = report.excluded,
        configs = ranked.train().len(),
        "aggregation complete"
    );
    Ok((ranked, report, artifacts))
}

/// Final per-mode rankings, best accuracy first.
#[derive(Debug, Clone)]
pub struct RankedResults {
    train: Vec<(ConfigKey, AggregateSummary)>,
    validation: Vec<(ConfigKey, AggregateSummary)>,
    indent: usize,
    train_file: String,
    validation_file: String,
}

impl RankedResults {
    /// Train ranking.
    #[must_use]
    pub fn train(&self) -> &[(ConfigKey, AggregateSummary)] {
        &self.train
    }

    /// Validation ranking.
    #[must_use]
    pub fn validation(&self) -> &[(ConfigKey, AggregateSummary)] {
        &self.validation
    }

    /// Ranking for one mode.
    #[must_use]
    pub fn ranking(&self, mode: Mode) -> &[(ConfigKey, AggregateSummary)] {
        match mode {
            Mode::Train => &self.train,
            Mode::Validation => &self.validation,
        }
    }

    /// The `k` best configs of one mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `k` is zero.
    pub fn top_k(&self, mode: Mode, k: usize) -> Result<Vec<&(ConfigKey, AggregateSummary)>> {
        top_k(
            self.ranking(mode),
            k,
            |(_, summary)| summary.max_accuracy(),
            SortOrder::Descending,
        )
    }

    /// Write one mode's ranking as an indented JSON mapping in rank order.
    ///
    /// # Errors
    ///
    /// Propagates serialization and write errors.
    pub fn write_json<W: Write>(&self, mode: Mode, writer: W) -> Result<()> {
        let indent = vec![b' '; self.indent];
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
        RankedMap(self.ranking(mode)).serialize(&mut serializer)?;
        Ok(())
    }

    /// Render one mode's ranking as an indented JSON string.
    ///
    /// # Errors
    ///
    /// Propagates serialization errors.
    pub fn to_json(&self, mode: Mode) -> Result<String> {
        let mut buf = Vec::new();
        self.write_json(mode, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
    }

    /// Write both summary files into `dir`.
    ///
    /// Each summary is first written to a hidden staging file next to its
    /// target; targets are replaced by rename only after both staged writes
    /// succeed, so a failed write leaves any earlier summaries untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written or moved into place.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<SummaryArtifacts> {
        let dir = dir.as_ref();
        let train = dir.join(&self.train_file);
        let validation = dir.join(&self.validation_file);

        let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(2);
        for (mode, path) in [(Mode::Train, &train), (Mode::Validation, &validation)] {
            match self.stage(mode, path) {
                Ok(staging) => staged.push((staging, path.as_path())),
                Err(e) => {
                    for (staging, _) in &staged {
                        let _ = fs::remove_file(staging);
                    }
                    return Err(e);
                }
            }
        }

        for (staging, path) in &staged {
            fs::rename(staging, path)?;
            debug!(path = %path.display(), "wrote summary");
        }

        Ok(SummaryArtifacts { train, validation })
    }

    fn stage(&self, mode: Mode, path: &Path) -> Result<PathBuf> {
        let staging = staging_path(path);
        let written = File::create(&staging).map_err(Error::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            self.write_json(mode, &mut writer)?;
            writer.flush()?;
            Ok(())
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        Ok(staging)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Paths written by [`RankedResults::write_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryArtifacts {
    /// Train summary file.
    pub train: PathBuf,
    /// Validation summary file.
    pub validation: PathBuf,
}

// Serializes as a JSON object whose key order is the ranking order.
struct RankedMap<'a>(&'a [(ConfigKey, AggregateSummary)]);

impl Serialize for RankedMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, summary) in self.0 {
            map.serialize_entry(&key.to_string(), summary)?;
        }
        map.end()
    }
}
