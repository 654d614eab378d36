//! Pipeline errors.

use super::error_code::{self, LoreErrorCode};
use super::{ConfigError, ExtractionError, IndexError, ResolutionError, TaggerError};
use crate::models::ChapterRef;

/// Errors that can end a project run or reject an operator action.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The only condition that aborts a whole analysis run.
    #[error("tagger unavailable at chapter {chapter}: {source}")]
    TaggerUnavailable {
        chapter: ChapterRef,
        #[source]
        source: TaggerError,
    },

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LoreErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TaggerUnavailable { .. } => error_code::TAGGER_UNAVAILABLE,
            Self::Extraction(e) => e.error_code(),
            Self::Resolution(e) => e.error_code(),
            Self::Index(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
