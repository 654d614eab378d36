//! Event index errors.

use super::error_code::{self, LoreErrorCode};
use crate::models::{ConflictId, ConflictStatus};

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("unknown conflict {id}")]
    UnknownConflict { id: ConflictId },

    #[error("conflict {id} is already {status}")]
    InvalidTransition { id: ConflictId, status: ConflictStatus },

    #[error("export failed: {message}")]
    Export { message: String },
}

impl LoreErrorCode for IndexError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownConflict { .. } => error_code::UNKNOWN_CONFLICT,
            Self::InvalidTransition { .. } => error_code::INVALID_TRANSITION,
            Self::Export { .. } => error_code::EXPORT_ERROR,
        }
    }
}
