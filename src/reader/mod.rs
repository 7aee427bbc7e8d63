//! Dataset readers and one-hot encoders
//!
//! Loads partition files into random-access, length-queryable datasets of
//! `(input, label)` pairs for an external training loop. Every row is
//! validated and encoded at load time; access afterwards is read-only.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sum_game_pipeline::reader::{GameDataset, SumDataset};
//!
//! let train = SumDataset::load("data/train_file.txt", 100)?;
//! assert_eq!(train.n_features(), 200);
//! for batch in train.batches(32)? {
//!     for sample in batch {
//!         let _ = (sample.input(), sample.label());
//!     }
//! }
//! # Ok::<(), sum_game_pipeline::Error>(())
//! ```

mod one_hot;
mod reco_dataset;
mod rows;
mod sum_dataset;

pub use one_hot::{decode_one_hot, encode_one_hot};
pub use reco_dataset::RecoDataset;
pub use sum_dataset::SumDataset;

use std::slice::Chunks;

use crate::{Error, Result};

/// One encoded sample: sender input vector and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSample<L> {
    input: Vec<f32>,
    label: L,
}

impl<L> EncodedSample<L> {
    /// Pair an encoded input with its label.
    #[must_use]
    pub const fn new(input: Vec<f32>, label: L) -> Self {
        Self { input, label }
    }

    /// Concatenated one-hot blocks.
    #[must_use]
    pub fn input(&self) -> &[f32] {
        &self.input
    }

    /// Label (sum, or raw attribute vector).
    #[must_use]
    pub const fn label(&self) -> &L {
        &self.label
    }
}

/// Random-access view over an encoded dataset.
///
/// Mirrors what a batching data loader needs: a length, indexed access, and
/// the input width the agents must be sized for.
pub trait GameDataset {
    /// Label type of each sample.
    type Label;

    /// All samples in file order.
    fn samples(&self) -> &[EncodedSample<Self::Label>];

    /// Width of every input vector.
    fn n_features(&self) -> usize;

    /// Number of samples.
    fn len(&self) -> usize {
        self.samples().len()
    }

    /// Whether the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }

    /// Sample at `index`, if any.
    fn get(&self, index: usize) -> Option<&EncodedSample<Self::Label>> {
        self.samples().get(index)
    }

    /// Consecutive batches of `batch_size`; the last may be shorter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `batch_size` is zero.
    fn batches(&self, batch_size: usize) -> Result<Chunks<'_, EncodedSample<Self::Label>>> {
        if batch_size == 0 {
            return Err(Error::InvalidInput(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(self.samples().chunks(batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_cover_dataset() {
        let dataset = SumDataset::parse("t", "0 0 0\n1 1 2\n2 2 4\n1 0 1\n0 2 2\n", 3).unwrap();
        let sizes: Vec<usize> = dataset.batches(2).unwrap().map(<[_]>::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let dataset = SumDataset::parse("t", "0 0 0\n", 3).unwrap();
        assert!(matches!(dataset.batches(0), Err(Error::InvalidInput(_))));
    }
}
