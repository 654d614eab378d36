//! Entity resolution errors.

use super::error_code::{self, LoreErrorCode};
use crate::models::{EntityId, MentionRef};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Carried as the reason of a needs-review assignment, never returned
    /// from resolution itself.
    #[error("mention {mention} matches {} candidate entities", .candidates.len())]
    AmbiguousResolution {
        mention: MentionRef,
        candidates: Vec<EntityId>,
    },

    #[error("unknown entity {id}")]
    UnknownEntity { id: EntityId },

    #[error("unknown mention {mention}")]
    UnknownMention { mention: MentionRef },

    #[error("cannot split entity {entity}: {reason}")]
    InvalidSplit { entity: EntityId, reason: String },
}

impl LoreErrorCode for ResolutionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AmbiguousResolution { .. } => error_code::AMBIGUOUS_RESOLUTION,
            Self::UnknownEntity { .. } => error_code::UNKNOWN_ENTITY,
            Self::UnknownMention { .. } => error_code::UNKNOWN_MENTION,
            Self::InvalidSplit { .. } => error_code::INVALID_SPLIT,
        }
    }
}
