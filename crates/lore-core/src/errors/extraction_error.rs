//! Mention extraction errors.

use super::error_code::{self, LoreErrorCode};
use crate::models::ChapterRef;

/// Failure signal from the external tagger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaggerError {
    /// The model could not be loaded or invoked. Fatal for the run.
    #[error("model {model} unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    /// The tagger rejected this input (encoding, length). Chapter-scoped.
    #[error("unsupported input: {message}")]
    UnsupportedInput { message: String },
}

impl TaggerError {
    /// Whether the failure aborts the whole run rather than one chapter.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. })
    }
}

/// Errors that can occur during mention extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("tagger unavailable for chapter {chapter}: {source}")]
    TaggerUnavailable {
        chapter: ChapterRef,
        #[source]
        source: TaggerError,
    },

    #[error("invalid gazetteer term {term:?}: {reason}")]
    InvalidTerm { term: String, reason: String },
}

impl ExtractionError {
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::TaggerUnavailable { source, .. } => source.is_fatal(),
            Self::InvalidTerm { .. } => false,
        }
    }
}

impl LoreErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TaggerUnavailable {
                source: TaggerError::UnsupportedInput { .. },
                ..
            } => error_code::UNSUPPORTED_INPUT,
            Self::TaggerUnavailable { .. } => error_code::TAGGER_UNAVAILABLE,
            Self::InvalidTerm { .. } => error_code::INVALID_TERM,
        }
    }
}
