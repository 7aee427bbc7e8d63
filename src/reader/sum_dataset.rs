//! Sum-game dataset: two one-hot operands, integer sum label

use std::fs;
use std::path::Path;

use tracing::debug;

use super::rows::parse_rows;
use super::{encode_one_hot, EncodedSample, GameDataset};
use crate::{Error, Result};

/// In-memory sum-game partition.
///
/// Each `first second sum` row becomes a `2 × n_range` input vector with
/// `first` hot in the first block and `second` hot in the second, labelled
/// with `sum`.
#[derive(Debug, Clone)]
pub struct SumDataset {
    n_range: u32,
    samples: Vec<EncodedSample<u32>>,
}

impl SumDataset {
    /// Load and encode a partition file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any row is malformed
    /// (see [`SumDataset::parse`]).
    pub fn load<P: AsRef<Path>>(path: P, n_range: u32) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let dataset = Self::parse(&path.display().to_string(), &content, n_range)?;
        debug!(path = %path.display(), samples = dataset.len(), "loaded sum dataset");
        Ok(dataset)
    }

    /// Encode partition text; `source` names it in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for `n_range == 0`, and
    /// [`Error::MalformedRow`] for a row without exactly three integers, an
    /// operand outside `[0, n_range)`, or a sum that is not `first + second`.
    pub fn parse(source: &str, content: &str, n_range: u32) -> Result<Self> {
        if n_range == 0 {
            return Err(Error::InvalidInput("n_range must be at least 1".to_string()));
        }

        let samples = parse_rows(source, content, 3, 2, n_range)?
            .into_iter()
            .map(|row| {
                let (first, second, sum) = (row.fields[0], row.fields[1], row.fields[2]);
                if u64::from(first) + u64::from(second) != u64::from(sum) {
                    return Err(Error::MalformedRow {
                        path: source.to_string(),
                        line: row.line,
                        reason: format!("{first} + {second} != {sum}"),
                    });
                }
                Ok(EncodedSample::new(
                    encode_one_hot(&[first, second], n_range),
                    sum,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { n_range, samples })
    }

    /// Exclusive upper bound of each operand.
    #[must_use]
    pub const fn n_range(&self) -> u32 {
        self.n_range
    }
}

impl GameDataset for SumDataset {
    type Label = u32;

    fn samples(&self) -> &[EncodedSample<u32>] {
        &self.samples
    }

    fn n_features(&self) -> usize {
        2 * self.n_range as usize
    }
}
