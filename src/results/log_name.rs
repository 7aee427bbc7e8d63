//! Configuration keys parsed from run log file names

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Error, Result};

/// One experimental setting, shared by all of its reruns.
///
/// Displays as `vocab-maxlen-ec`, e.g. `10-5-0.1`. The entropy coefficient
/// keeps the spelling from the file name so keys stay stable across reruns.
#[derive(Debug, Clone)]
pub struct ConfigKey {
    vocab_size: u32,
    max_length: u32,
    entropy_coefficient: f64,
    entropy_token: String,
}

impl ConfigKey {
    /// Build a key; `entropy_coefficient` must parse as a float.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the coefficient is not a number.
    pub fn new(vocab_size: u32, max_length: u32, entropy_coefficient: &str) -> Result<Self> {
        let value = entropy_coefficient.parse::<f64>().map_err(|_| {
            Error::InvalidInput(format!(
                "entropy coefficient {entropy_coefficient:?} is not a number"
            ))
        })?;
        Ok(Self {
            vocab_size,
            max_length,
            entropy_coefficient: value,
            entropy_token: entropy_coefficient.to_string(),
        })
    }

    /// Vocabulary size.
    #[must_use]
    pub const fn vocab_size(&self) -> u32 {
        self.vocab_size
    }

    /// Maximum message length.
    #[must_use]
    pub const fn max_length(&self) -> u32 {
        self.max_length
    }

    /// Sender entropy regularisation coefficient.
    #[must_use]
    pub const fn entropy_coefficient(&self) -> f64 {
        self.entropy_coefficient
    }
}

impl PartialEq for ConfigKey {
    fn eq(&self, other: &Self) -> bool {
        self.vocab_size == other.vocab_size
            && self.max_length == other.max_length
            && self.entropy_token == other.entropy_token
    }
}

impl Eq for ConfigKey {}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vocab_size.hash(state);
        self.max_length.hash(state);
        self.entropy_token.hash(state);
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.vocab_size, self.max_length, self.entropy_token
        )
    }
}

/// Identity of one run log: `seed-<int>_vocab-<int>_maxlen-<int>_ec-<float>...`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogFileName {
    seed: u64,
    key: ConfigKey,
}

impl LogFileName {
    /// Parse the first four underscore-separated tokens of a file name.
    ///
    /// Anything after the fourth token is ignored, and a `.txt` suffix on
    /// the fourth token is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogName`] if a token is missing, lacks its
    /// label, or does not parse.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidLogName {
            name: name.to_string(),
            reason,
        };

        let mut tokens = name.split('_');
        let seed = labelled(name, tokens.next(), "seed-")?;
        let vocab = labelled(name, tokens.next(), "vocab-")?;
        let maxlen = labelled(name, tokens.next(), "maxlen-")?;
        let ec = labelled(name, tokens.next(), "ec-")?;
        let ec = ec.strip_suffix(".txt").unwrap_or(ec);

        let seed = seed
            .parse::<u64>()
            .map_err(|_| invalid(format!("seed {seed:?} is not an integer")))?;
        let vocab_size = vocab
            .parse::<u32>()
            .map_err(|_| invalid(format!("vocab {vocab:?} is not an integer")))?;
        let max_length = maxlen
            .parse::<u32>()
            .map_err(|_| invalid(format!("maxlen {maxlen:?} is not an integer")))?;
        let key = ConfigKey::new(vocab_size, max_length, ec).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { seed, key })
    }

    /// Random seed of the run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration the run belongs to.
    #[must_use]
    pub const fn key(&self) -> &ConfigKey {
        &self.key
    }

    /// Drop the seed, keeping the configuration.
    #[must_use]
    pub fn into_key(self) -> ConfigKey {
        self.key
    }
}

fn labelled<'a>(name: &str, token: Option<&'a str>, label: &str) -> Result<&'a str> {
    let invalid = |reason: String| Error::InvalidLogName {
        name: name.to_string(),
        reason,
    };
    let token = token.ok_or_else(|| invalid(format!("missing {label}<value> token")))?;
    token
        .strip_prefix(label)
        .ok_or_else(|| invalid(format!("token {token:?} does not start with {label:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_name() {
        let name = LogFileName::parse("seed-3_vocab-10_maxlen-5_ec-0.1.txt").unwrap();
        assert_eq!(name.seed(), 3);
        assert_eq!(name.key().vocab_size(), 10);
        assert_eq!(name.key().max_length(), 5);
        assert!((name.key().entropy_coefficient() - 0.1).abs() < f64::EPSILON);
        assert_eq!(name.key().to_string(), "10-5-0.1");
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        let name = LogFileName::parse("seed-1_vocab-20_maxlen-2_ec-1e-2_gs_run.log").unwrap();
        assert_eq!(name.key().to_string(), "20-2-1e-2");
    }

    #[test]
    fn test_seed_not_part_of_key() {
        let a = LogFileName::parse("seed-1_vocab-10_maxlen-5_ec-0.5.txt").unwrap();
        let b = LogFileName::parse("seed-2_vocab-10_maxlen-5_ec-0.5.txt").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_missing_token() {
        let err = LogFileName::parse("seed-1_vocab-10_maxlen-5").err().unwrap();
        assert!(err.to_string().contains("missing ec-"));
    }

    #[test]
    fn test_wrong_label() {
        let err = LogFileName::parse("seed-1_voc-10_maxlen-5_ec-0.1").err().unwrap();
        assert!(matches!(err, Error::InvalidLogName { .. }));
    }

    #[test]
    fn test_bad_number() {
        assert!(LogFileName::parse("seed-x_vocab-10_maxlen-5_ec-0.1").is_err());
        assert!(LogFileName::parse("seed-1_vocab-10_maxlen-5_ec-high.txt").is_err());
    }
}
