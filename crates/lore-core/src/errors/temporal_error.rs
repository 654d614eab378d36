//! Temporal anchor parse errors. Never fatal: the anchor is dropped.

use super::error_code::{self, LoreErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemporalError {
    #[error("malformed anchor token {token:?}")]
    Malformed { token: String },

    #[error("unknown anchor kind {kind:?}")]
    UnknownKind { kind: String },

    #[error("invalid {kind} value {value:?}")]
    InvalidValue { kind: String, value: String },

    #[error("{kind} value {value} outside [{min}, {max}]")]
    OutOfRange {
        kind: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("unknown life phase {value:?}")]
    UnknownPhase { value: String },

    #[error("anchor token {token:?} has no entity id")]
    MissingEntity { token: String },
}

impl LoreErrorCode for TemporalError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
