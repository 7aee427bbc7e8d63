//! Reconstruction-game dataset: attribute-value rows

use std::fs;
use std::path::Path;

use tracing::debug;

use super::rows::parse_rows;
use super::{encode_one_hot, EncodedSample, GameDataset};
use crate::{Error, Result};

/// In-memory reconstruction-game partition.
///
/// Each row of `n_attributes` values in `[0, n_values)` becomes one one-hot
/// block per attribute; the label is the raw attribute vector.
#[derive(Debug, Clone)]
pub struct RecoDataset {
    n_attributes: usize,
    n_values: u32,
    samples: Vec<EncodedSample<Vec<u32>>>,
}

impl RecoDataset {
    /// Load and encode an attribute-value file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any row is malformed.
    pub fn load<P: AsRef<Path>>(path: P, n_attributes: usize, n_values: u32) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let dataset = Self::parse(&path.display().to_string(), &content, n_attributes, n_values)?;
        debug!(path = %path.display(), samples = dataset.len(), "loaded reco dataset");
        Ok(dataset)
    }

    /// Encode attribute-value text; `source` names it in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for zero attributes or values, and
    /// [`Error::MalformedRow`] for a row of the wrong arity or with a value
    /// outside `[0, n_values)`.
    pub fn parse(source: &str, content: &str, n_attributes: usize, n_values: u32) -> Result<Self> {
        if n_attributes == 0 || n_values == 0 {
            return Err(Error::InvalidInput(format!(
                "n_attributes ({n_attributes}) and n_values ({n_values}) must be at least 1"
            )));
        }

        let samples = parse_rows(source, content, n_attributes, n_attributes, n_values)?
            .into_iter()
            .map(|row| EncodedSample::new(encode_one_hot(&row.fields, n_values), row.fields))
            .collect();

        Ok(Self {
            n_attributes,
            n_values,
            samples,
        })
    }

    /// Attributes per row.
    #[must_use]
    pub const fn n_attributes(&self) -> usize {
        self.n_attributes
    }

    /// Values per attribute.
    #[must_use]
    pub const fn n_values(&self) -> u32 {
        self.n_values
    }
}

impl GameDataset for RecoDataset {
    type Label = Vec<u32>;

    fn samples(&self) -> &[EncodedSample<Vec<u32>>] {
        &self.samples
    }

    fn n_features(&self) -> usize {
        self.n_attributes * self.n_values as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::decode_one_hot;

    #[test]
    fn test_label_is_raw_vector() {
        let dataset = RecoDataset::parse("t", "0 2 1\n3 3 0\n", 3, 4).unwrap();
        assert_eq!(dataset.n_features(), 12);
        let sample = dataset.get(1).unwrap();
        assert_eq!(sample.label(), &vec![3, 3, 0]);
        assert_eq!(decode_one_hot(sample.input(), 4), Some(vec![3, 3, 0]));
    }

    #[test]
    fn test_single_attribute_rows() {
        let dataset = RecoDataset::parse("t", "2\n0\n", 1, 3).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(0).unwrap().input(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_every_attribute_range_checked() {
        let err = RecoDataset::parse("t", "0 1 4\n", 3, 4).err().unwrap();
        assert!(err.to_string().contains("field 3 = 4"));
    }

    #[test]
    fn test_wrong_arity() {
        assert!(RecoDataset::parse("t", "0 1\n", 3, 4).is_err());
        assert!(RecoDataset::parse("t", "0 1 2 3\n", 3, 4).is_err());
    }

    #[test]
    fn test_feature_width_without_rows() {
        let dataset = RecoDataset::parse("t", "", 5, 10).unwrap();
        assert_eq!(dataset.n_features(), 50);
    }
}
