use serde::{Deserialize, Serialize};

use lore_core::models::{AnchorRecord, AttributeAssertion, ChapterRef, EntityId, MentionRef};

/// One entry of the ledger log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    AssertionRecorded(AttributeAssertion),
    AnchorRecorded(AnchorRecord),
    /// Facts recorded earlier for this chapter no longer count.
    ChapterRetired { chapter: ChapterRef },
    /// `from` was merged into `to`.
    EntityRedirected { from: EntityId, to: EntityId },
    /// Operator moved one mention, and its facts, to another entity.
    MentionReassigned { mention: MentionRef, entity: EntityId },
}

impl LedgerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AssertionRecorded(_) => "assertion_recorded",
            Self::AnchorRecorded(_) => "anchor_recorded",
            Self::ChapterRetired { .. } => "chapter_retired",
            Self::EntityRedirected { .. } => "entity_redirected",
            Self::MentionReassigned { .. } => "mention_reassigned",
        }
    }
}
