//! Append-only log of per-interval event counts.

use serde::Serialize;
use thiserror::Error;

/// Entry text that cannot be stored as a count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("empty entry: type a whole number of events (0, 1, 2, ...)")]
    Empty,

    #[error("invalid value {0:?}: type a whole number of events (0, 1, 2, ...)")]
    NotAnInteger(String),

    #[error("negative value {0}: event counts cannot be below 0")]
    Negative(String),
}

/// Parse operator text as a non-negative event count.
///
/// Surrounding whitespace is ignored and a leading `+` is accepted.
pub fn parse_count(text: &str) -> Result<u64, InvalidInput> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::Empty);
    }
    let not_an_integer = || InvalidInput::NotAnInteger(trimmed.to_string());

    if let Some(magnitude) = trimmed.strip_prefix('-') {
        // u64's parser would accept a second sign.
        if magnitude.starts_with('+') {
            return Err(not_an_integer());
        }
        let value: u64 = magnitude.parse().map_err(|_| not_an_integer())?;
        if value == 0 {
            return Ok(0);
        }
        return Err(InvalidInput::Negative(trimmed.to_string()));
    }
    trimmed.parse().map_err(|_| not_an_integer())
}

/// Ordered counts, one per completed interval. Never reordered or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObservationLog {
    values: Vec<u64>,
}

impl ObservationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `text` and append it. Returns the new length.
    ///
    /// On error the log is left unchanged.
    pub fn append(&mut self, text: &str) -> Result<usize, InvalidInput> {
        let value = parse_count(text)?;
        Ok(self.append_count(value))
    }

    /// Append an already validated count. Returns the new length.
    pub fn append_count(&mut self, value: u64) -> usize {
        self.values.push(value);
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<u64> {
        self.values.last().copied()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }
}

impl FromIterator<u64> for ObservationLog {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        ObservationLog {
            values: iter.into_iter().collect(),
        }
    }
}
