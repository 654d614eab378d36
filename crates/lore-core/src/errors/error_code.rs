//! Stable machine-readable error codes.

/// Every error enum implements this to expose a stable code string for
/// the surrounding application (UI, report writers).
pub trait LoreErrorCode {
    /// Returns the error code string (e.g., "TAGGER_UNAVAILABLE").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const TAGGER_UNAVAILABLE: &str = "TAGGER_UNAVAILABLE";
pub const UNSUPPORTED_INPUT: &str = "UNSUPPORTED_INPUT";
pub const INVALID_TERM: &str = "INVALID_TERM";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const AMBIGUOUS_RESOLUTION: &str = "AMBIGUOUS_RESOLUTION";
pub const UNKNOWN_ENTITY: &str = "UNKNOWN_ENTITY";
pub const UNKNOWN_MENTION: &str = "UNKNOWN_MENTION";
pub const INVALID_SPLIT: &str = "INVALID_SPLIT";
pub const UNKNOWN_CONFLICT: &str = "UNKNOWN_CONFLICT";
pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
pub const EXPORT_ERROR: &str = "EXPORT_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
