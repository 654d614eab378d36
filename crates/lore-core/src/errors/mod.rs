//! Error handling for lore.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod extraction_error;
pub mod index_error;
pub mod pipeline_error;
pub mod resolution_error;
pub mod temporal_error;

pub use config_error::ConfigError;
pub use error_code::LoreErrorCode;
pub use extraction_error::{ExtractionError, TaggerError};
pub use index_error::IndexError;
pub use pipeline_error::PipelineError;
pub use resolution_error::ResolutionError;
pub use temporal_error::TemporalError;

/// Umbrella error for callers that do not care which subsystem failed.
#[derive(Debug, thiserror::Error)]
pub enum LoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl LoreErrorCode for LoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Extraction(e) => e.error_code(),
            Self::Temporal(e) => e.error_code(),
            Self::Resolution(e) => e.error_code(),
            Self::Index(e) => e.error_code(),
            Self::Pipeline(e) => e.error_code(),
        }
    }
}

pub type LoreResult<T> = Result<T, LoreError>;
