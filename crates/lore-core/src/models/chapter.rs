use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable chapter locator. Ordering is narrative order: book, then chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterRef {
    pub book: u16,
    pub chapter: u32,
}

impl ChapterRef {
    pub fn new(book: u16, chapter: u32) -> Self {
        Self { book, chapter }
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.book, self.chapter)
    }
}

impl FromStr for ChapterRef {
    type Err = String;

    /// Parses the `"B.C"` rendering.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (book, chapter) = s
            .split_once('.')
            .ok_or_else(|| format!("expected <book>.<chapter>, got {s:?}"))?;
        Ok(Self {
            book: book.parse().map_err(|_| format!("invalid book in {s:?}"))?,
            chapter: chapter
                .parse()
                .map_err(|_| format!("invalid chapter in {s:?}"))?,
        })
    }
}

/// Half-open range of char offsets `[start, end)` within a chapter's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A chapter of plain text as delivered by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub reference: ChapterRef,
    pub text: String,
    /// Analepsis: the chapter narrates earlier story-time than its position.
    #[serde(default)]
    pub flashback: bool,
    /// Attribute and anchor facts produced by the upstream annotator.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Chapter {
    pub fn new(reference: ChapterRef, text: impl Into<String>) -> Self {
        Self {
            reference,
            text: text.into(),
            flashback: false,
            annotations: Vec::new(),
        }
    }
}

/// A fact attached to a span of a chapter. The span must overlap an
/// extracted mention for the fact to be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub span: Span,
    pub payload: AnnotationPayload,
    /// Bare anchor `kind:value[/reference]`; the entity part is implicit.
    #[serde(default)]
    pub anchor: Option<String>,
    /// Defaults to the confidence of the mention the span lands on.
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationPayload {
    /// An attribute value holding at the annotation's anchor.
    Attribute { name: String, value: String },
    /// A bare temporal anchor for the entity (e.g. "she was thirty then").
    Anchor,
}
