//! Example - one `(first, second, first + second)` triple

use std::fmt;

use serde::{Deserialize, Serialize};

/// One sum-game example. The sum is derived, never supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Example {
    first: u32,
    second: u32,
    sum: u32,
}

impl Example {
    /// Build the example for `first + second`.
    ///
    /// Operands come from a validated range, so the sum cannot overflow.
    #[must_use]
    pub const fn new(first: u32, second: u32) -> Self {
        Self {
            first,
            second,
            sum: first + second,
        }
    }

    /// First operand.
    #[must_use]
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Second operand.
    #[must_use]
    pub const fn second(&self) -> u32 {
        self.second
    }

    /// `first + second`.
    #[must_use]
    pub const fn sum(&self) -> u32 {
        self.sum
    }

    /// Operand-order-insensitive key for holdout bookkeeping.
    #[must_use]
    pub const fn key(&self) -> UnorderedKey {
        UnorderedKey::new(self.first, self.second)
    }
}

/// Serialized form: `first second sum`.
impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.first, self.second, self.sum)
    }
}

/// The set `{first, second}`. `(3, 7)` and `(7, 3)` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnorderedKey {
    low: u32,
    high: u32,
}

impl UnorderedKey {
    /// Normalise the pair so the smaller operand comes first.
    #[must_use]
    pub const fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Smaller operand.
    #[must_use]
    pub const fn low(&self) -> u32 {
        self.low
    }

    /// Larger operand.
    #[must_use]
    pub const fn high(&self) -> u32 {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_sum() {
        let example = Example::new(302, 101);
        assert_eq!(example.sum(), 403);
        assert_eq!(example.to_string(), "302 101 403");
    }

    #[test]
    fn test_swapped_operands_share_key() {
        assert_eq!(Example::new(3, 7).key(), Example::new(7, 3).key());
        assert_ne!(Example::new(3, 7).key(), Example::new(3, 8).key());
    }

    #[test]
    fn test_key_normalised() {
        let key = UnorderedKey::new(9, 2);
        assert_eq!(key.low(), 2);
        assert_eq!(key.high(), 9);
    }

    #[test]
    fn test_diagonal_key() {
        let key = Example::new(5, 5).key();
        assert_eq!((key.low(), key.high()), (5, 5));
    }
}
