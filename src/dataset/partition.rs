//! Partition - a named, ordered run of examples

use std::io::{self, Write};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{Example, UnorderedKey};

/// Which split a partition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKind {
    /// Training split.
    Train,
    /// Development (validation) split.
    Dev,
    /// Test split.
    Test,
}

impl PartitionKind {
    /// Name used in file names and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }
}

/// Ordered examples of one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    kind: PartitionKind,
    examples: Vec<Example>,
}

impl Partition {
    /// Wrap one split's examples.
    #[must_use]
    pub const fn new(kind: PartitionKind, examples: Vec<Example>) -> Self {
        Self { kind, examples }
    }

    /// Split this partition belongs to.
    #[must_use]
    pub const fn kind(&self) -> PartitionKind {
        self.kind
    }

    /// Examples in generation order.
    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the partition holds no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Unordered keys of every example.
    #[must_use]
    pub fn keys(&self) -> FxHashSet<UnorderedKey> {
        self.examples.iter().map(Example::key).collect()
    }

    /// Write one `first second sum` line per example.
    ///
    /// # Errors
    ///
    /// Propagates any write error.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for example in &self.examples {
            writeln!(writer, "{example}")?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lines() {
        let partition = Partition::new(
            PartitionKind::Test,
            vec![Example::new(1, 2), Example::new(0, 0)],
        );
        let mut buf = Vec::new();
        partition.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1 2 3\n0 0 0\n");
    }

    #[test]
    fn test_empty_partition_writes_nothing() {
        let partition = Partition::new(PartitionKind::Dev, Vec::new());
        let mut buf = Vec::new();
        partition.write_to(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert!(partition.is_empty());
    }

    #[test]
    fn test_keys_collapse_swaps() {
        let partition = Partition::new(
            PartitionKind::Train,
            vec![Example::new(1, 2), Example::new(2, 1), Example::new(4, 4)],
        );
        assert_eq!(partition.keys().len(), 2);
    }
}
