//! Generated dataset and its on-disk artifacts

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Partition, PartitionKind};
use crate::config::GeneratorConfig;
use crate::Result;

/// The three partitions of one generation run, plus its config.
#[derive(Debug, Clone)]
pub struct GeneratedDataset {
    config: GeneratorConfig,
    train: Partition,
    dev: Partition,
    test: Partition,
    dropped_train_candidates: usize,
}

impl GeneratedDataset {
    pub(crate) const fn new(
        config: GeneratorConfig,
        train: Partition,
        dev: Partition,
        test: Partition,
        dropped_train_candidates: usize,
    ) -> Self {
        Self {
            config,
            train,
            dev,
            test,
            dropped_train_candidates,
        }
    }

    /// Config the dataset was generated from.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Train partition.
    #[must_use]
    pub const fn train(&self) -> &Partition {
        &self.train
    }

    /// Dev partition.
    #[must_use]
    pub const fn dev(&self) -> &Partition {
        &self.dev
    }

    /// Test partition.
    #[must_use]
    pub const fn test(&self) -> &Partition {
        &self.test
    }

    /// Partitions in write order: train, dev, test.
    #[must_use]
    pub const fn partitions(&self) -> [&Partition; 3] {
        [&self.train, &self.dev, &self.test]
    }

    /// Train candidates discarded because their key was held out.
    #[must_use]
    pub const fn dropped_train_candidates(&self) -> usize {
        self.dropped_train_candidates
    }

    /// Name fragment shared by all artifacts of this dataset.
    ///
    /// Embeds the range, realized partition sizes, strategy and holdout
    /// flag, e.g. `range-100_train-9800_dev-100_test-100_exhaustive_holdout-false`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "range-{}_train-{}_dev-{}_test-{}_{}_holdout-{}",
            self.config.input_range(),
            self.train.len(),
            self.dev.len(),
            self.test.len(),
            self.config.strategy().as_str(),
            self.config.holdout_pairs()
        )
    }

    /// File name for one partition.
    #[must_use]
    pub fn partition_file_name(&self, kind: PartitionKind) -> String {
        format!("{}_file_{}.txt", kind.as_str(), self.file_stem())
    }

    /// File name for the manifest.
    #[must_use]
    pub fn manifest_file_name(&self) -> String {
        format!("manifest_{}.json", self.file_stem())
    }

    /// Write the three partition files and the manifest into `dir`.
    ///
    /// The directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<DatasetArtifacts> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let train = self.write_partition(dir, &self.train)?;
        let dev = self.write_partition(dir, &self.dev)?;
        let test = self.write_partition(dir, &self.test)?;

        let manifest = DatasetManifest {
            config: self.config.clone(),
            train_examples: self.train.len(),
            dev_examples: self.dev.len(),
            test_examples: self.test.len(),
            dropped_train_candidates: self.dropped_train_candidates,
            files: ManifestFiles {
                train: self.partition_file_name(PartitionKind::Train),
                dev: self.partition_file_name(PartitionKind::Dev),
                test: self.partition_file_name(PartitionKind::Test),
            },
            created_at: Utc::now(),
        };
        let manifest_path = dir.join(self.manifest_file_name());
        let mut writer = BufWriter::new(File::create(&manifest_path)?);
        serde_json::to_writer_pretty(&mut writer, &manifest)?;
        writer.flush()?;

        info!(dir = %dir.display(), stem = %self.file_stem(), "wrote dataset");

        Ok(DatasetArtifacts {
            train,
            dev,
            test,
            manifest: manifest_path,
        })
    }

    fn write_partition(&self, dir: &Path, partition: &Partition) -> Result<PathBuf> {
        let path = dir.join(self.partition_file_name(partition.kind()));
        partition.write_to(BufWriter::new(File::create(&path)?))?;
        debug!(path = %path.display(), examples = partition.len(), "wrote partition");
        Ok(path)
    }
}

/// Paths written by [`GeneratedDataset::write_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetArtifacts {
    /// Train partition file.
    pub train: PathBuf,
    /// Dev partition file.
    pub dev: PathBuf,
    /// Test partition file.
    pub test: PathBuf,
    /// Manifest JSON.
    pub manifest: PathBuf,
}

/// Provenance record stored next to the partition files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Generation config.
    pub config: GeneratorConfig,
    /// Realized train size.
    pub train_examples: usize,
    /// Realized dev size.
    pub dev_examples: usize,
    /// Realized test size.
    pub test_examples: usize,
    /// Train candidates dropped by holdout.
    pub dropped_train_candidates: usize,
    /// Partition file names, relative to the manifest.
    pub files: ManifestFiles,
    /// Generation time.
    pub created_at: DateTime<Utc>,
}

/// Partition file names recorded in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFiles {
    /// Train file name.
    pub train: String,
    /// Dev file name.
    pub dev: String,
    /// Test file name.
    pub test: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;
    use crate::dataset::DatasetGenerator;

    fn small_dataset(holdout: bool) -> GeneratedDataset {
        let config = GeneratorConfig::builder()
            .input_range(4)
            .n_test(3)
            .n_dev(2)
            .holdout_pairs(holdout)
            .seed(1)
            .build()
            .unwrap();
        DatasetGenerator::new(config).unwrap().generate()
    }

    #[test]
    fn test_file_stem_embeds_parameters() {
        let dataset = small_dataset(false);
        assert_eq!(
            dataset.file_stem(),
            "range-4_train-11_dev-2_test-3_exhaustive_holdout-false"
        );
        assert_eq!(
            dataset.partition_file_name(PartitionKind::Dev),
            "dev_file_range-4_train-11_dev-2_test-3_exhaustive_holdout-false.txt"
        );
    }

    #[test]
    fn test_holdout_flag_changes_names() {
        let plain = small_dataset(false);
        let held = small_dataset(true);
        assert_ne!(plain.manifest_file_name(), held.manifest_file_name());
    }

    #[test]
    fn test_sampled_stem() {
        let config = GeneratorConfig::builder()
            .input_range(5)
            .n_train(7)
            .n_test(1)
            .n_dev(1)
            .strategy(Strategy::Sampled)
            .seed(4)
            .build()
            .unwrap();
        let dataset = DatasetGenerator::new(config).unwrap().generate();
        assert!(dataset.file_stem().contains("_sampled_"));
    }
}
