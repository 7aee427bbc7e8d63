//! Dataset generator - exhaustive and sampled strategies

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::{info, warn};

use super::{Example, GeneratedDataset, Partition, PartitionKind, UnorderedKey};
use crate::config::{GeneratorConfig, Rejection, Strategy};
use crate::Result;

/// Produces train/dev/test partitions from a validated config.
///
/// ## Guarantees
///
/// - Exhaustive: test and dev have exactly the requested sizes, every
///   ordered pair is used at most once, train is the remainder.
/// - Sampled: test and dev have exactly the requested sizes; train has at
///   most `n_train` examples when holdout drops colliding candidates.
/// - Holdout (either strategy): no train example's unordered key occurs in
///   dev or test.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    config: GeneratorConfig,
}

impl DatasetGenerator {
    /// Create a generator, rejecting inconsistent configs up front.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if the config does not validate.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The generator's config.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate with an RNG seeded from the config (or from entropy).
    #[must_use]
    pub fn generate(&self) -> GeneratedDataset {
        let mut rng = match self.config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with(&mut rng)
    }

    /// Generate with a caller-supplied RNG.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> GeneratedDataset {
        let (train, dev, test, dropped) = match self.config.strategy() {
            Strategy::Exhaustive => self.exhaustive(rng),
            Strategy::Sampled => self.sampled(rng),
        };

        info!(
            test = test.len(),
            dev = dev.len(),
            train = train.len(),
            strategy = self.config.strategy().as_str(),
            holdout = self.config.holdout_pairs(),
            "generated dataset"
        );

        GeneratedDataset::new(
            self.config.clone(),
            Partition::new(PartitionKind::Train, train),
            Partition::new(PartitionKind::Dev, dev),
            Partition::new(PartitionKind::Test, test),
            dropped,
        )
    }

    fn exhaustive<R: Rng>(
        &self,
        rng: &mut R,
    ) -> (Vec<Example>, Vec<Example>, Vec<Example>, usize) {
        let range = self.config.input_range();
        let mut pairs: Vec<Example> = (0..range)
            .flat_map(|first| (0..range).map(move |second| Example::new(first, second)))
            .collect();
        pairs.shuffle(rng);

        // validate() guarantees n_test + n_dev <= range²
        let mut remainder = pairs.split_off(self.config.n_test());
        let test = pairs;
        let rest = remainder.split_off(self.config.n_dev());
        let dev = remainder;

        let (train, dropped) = if self.config.holdout_pairs() {
            let held_out = held_out_keys(&dev, &test);
            let before = rest.len();
            let train: Vec<Example> = rest
                .into_iter()
                .filter(|example| !held_out.contains(&example.key()))
                .collect();
            let dropped = before - train.len();
            (train, dropped)
        } else {
            (rest, 0)
        };

        (train, dev, test, dropped)
    }

    fn sampled<R: Rng>(
        &self,
        rng: &mut R,
    ) -> (Vec<Example>, Vec<Example>, Vec<Example>, usize) {
        let range = self.config.input_range();
        let n_train = self.config.n_train();

        let test = draw_many(rng, range, self.config.n_test());
        let dev = draw_many(rng, range, self.config.n_dev());

        if !self.config.holdout_pairs() {
            return (draw_many(rng, range, n_train), dev, test, 0);
        }

        let held_out = held_out_keys(&dev, &test);
        let mut train = Vec::with_capacity(n_train);
        let mut dropped = 0;

        match self.config.rejection() {
            Rejection::Drop => {
                for _ in 0..n_train {
                    let candidate = draw(rng, range);
                    if held_out.contains(&candidate.key()) {
                        dropped += 1;
                    } else {
                        train.push(candidate);
                    }
                }
                if dropped > 0 {
                    warn!(
                        requested = n_train,
                        realized = train.len(),
                        dropped,
                        "holdout collisions shrank the train partition"
                    );
                }
            }
            Rejection::Resample { max_attempts } => {
                let mut attempts = 0;
                while train.len() < n_train && attempts < max_attempts {
                    attempts += 1;
                    let candidate = draw(rng, range);
                    if held_out.contains(&candidate.key()) {
                        dropped += 1;
                    } else {
                        train.push(candidate);
                    }
                }
                if train.len() < n_train {
                    warn!(
                        requested = n_train,
                        realized = train.len(),
                        max_attempts,
                        "resample budget exhausted before train partition was filled"
                    );
                }
            }
        }

        (train, dev, test, dropped)
    }
}

fn draw<R: Rng>(rng: &mut R, range: u32) -> Example {
    Example::new(rng.gen_range(0..range), rng.gen_range(0..range))
}

fn draw_many<R: Rng>(rng: &mut R, range: u32, n: usize) -> Vec<Example> {
    (0..n).map(|_| draw(rng, range)).collect()
}

fn held_out_keys(dev: &[Example], test: &[Example]) -> FxHashSet<UnorderedKey> {
    dev.iter().chain(test).map(Example::key).collect()
}
