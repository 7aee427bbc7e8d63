//! Whitespace-separated integer rows

use crate::{Error, Result};

/// One parsed data row and its 1-based line number.
pub(crate) struct Row {
    pub line: usize,
    pub fields: Vec<u32>,
}

/// Parse every non-blank line of `content` into exactly `arity` integers.
///
/// `bound` limits the first `bounded` fields to `[0, bound)`.
pub(crate) fn parse_rows(
    source: &str,
    content: &str,
    arity: usize,
    bounded: usize,
    bound: u32,
) -> Result<Vec<Row>> {
    let mut rows = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let malformed = |reason: String| Error::MalformedRow {
            path: source.to_string(),
            line,
            reason,
        };

        let fields = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<u32>().map_err(|_| {
                    malformed(format!("{token:?} is not a non-negative integer"))
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        if fields.len() != arity {
            return Err(malformed(format!(
                "expected {arity} fields, found {}",
                fields.len()
            )));
        }

        if let Some((position, value)) = fields
            .iter()
            .take(bounded)
            .enumerate()
            .find(|(_, &value)| value >= bound)
        {
            return Err(malformed(format!(
                "field {} = {value} is outside [0, {bound})",
                position + 1
            )));
        }

        rows.push(Row { line, fields });
    }

    Ok(rows)
}
