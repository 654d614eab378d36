use serde::{Deserialize, Serialize};

use crate::errors::TaggerError;

/// A raw entity candidate returned by the tagger.
/// Offsets are char offsets into the tagged text, half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub start: usize,
    pub end: usize,
    /// Model label ("PER", "LOC", "ORG", "MISC", ...).
    pub label: String,
}

impl TaggedSpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// External statistical tagger.
///
/// Must be deterministic for identical input. Called concurrently from
/// extraction workers.
pub trait ITagger: Send + Sync {
    /// Model name, for logs.
    fn name(&self) -> &str;

    /// Tag plain text.
    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError>;
}
