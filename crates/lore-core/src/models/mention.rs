use serde::{Deserialize, Serialize};
use std::fmt;

use super::chapter::{ChapterRef, Span};
use crate::confidence::Confidence;

/// Coarse entity type carried by a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Person,
    Location,
    Organization,
}

impl MentionKind {
    /// Short tag used in reports ("PER", "LOC", "ORG").
    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "PER",
            Self::Location => "LOC",
            Self::Organization => "ORG",
        }
    }

    /// Map a tagger label onto a kind. Unknown labels (MISC, DATE, ...) yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => Some(Self::Person),
            "LOC" | "LOCATION" | "GPE" => Some(Self::Location),
            "ORG" | "ORGANIZATION" | "ORGANISATION" => Some(Self::Organization),
            _ => None,
        }
    }
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a mention came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionSource {
    /// The external statistical tagger.
    Tagger,
    /// Capitalized-token scan backed by the project gazetteer.
    Gazetteer,
}

/// Back-reference to a mention: chapter plus position in that chapter's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MentionRef {
    pub chapter: ChapterRef,
    pub ordinal: u32,
}

impl fmt::Display for MentionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.chapter, self.ordinal)
    }
}

/// A single textual occurrence of a name. Owned by its chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub chapter: ChapterRef,
    /// Position in the chapter's ordered mention list.
    pub ordinal: u32,
    pub text: String,
    pub kind: MentionKind,
    pub span: Span,
    pub confidence: Confidence,
    pub source: MentionSource,
}

impl Mention {
    pub fn reference(&self) -> MentionRef {
        MentionRef {
            chapter: self.chapter,
            ordinal: self.ordinal,
        }
    }
}
