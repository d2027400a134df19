//! Per-step conversation memory.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One prior prompt input and the text the model produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub input: String,
    pub output: String,
}

impl Exchange {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Ordered, append-only list of exchanges.
///
/// A transcript is never mutated in place: [`Transcript::appended`] returns a
/// new value, so a transcript handed to a completion call stays fixed even if
/// the pipeline records further exchanges afterwards. Clones share storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Arc<[Exchange]>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new transcript with `exchange` at the end, keeping at most `limit`
    /// of the newest entries. A limit of zero records nothing.
    pub fn appended(&self, exchange: Exchange, limit: usize) -> Self {
        let skip = (self.entries.len() + 1).saturating_sub(limit);
        let entries: Vec<Exchange> = self
            .entries
            .iter()
            .cloned()
            .chain(std::iter::once(exchange))
            .skip(skip)
            .collect();

        Self {
            entries: entries.into(),
        }
    }

    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exchange> {
        self.entries.iter()
    }
}

impl FromIterator<Exchange> for Transcript {
    fn from_iter<I: IntoIterator<Item = Exchange>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Exchange;
    type IntoIter = std::slice::Iter<'a, Exchange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
