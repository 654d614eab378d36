use serde::{Deserialize, Serialize};

use lore_core::models::{AnchorRecord, AttributeAssertion, ChapterRef, Entity};
use lore_index::ConflictRecord;
use lore_ledger::LedgerEvent;
use lore_resolution::{Assignment, MergeSuggestion};

use crate::report::ChapterState;

/// Everything a project has derived, as plain data for the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecords {
    pub project: String,
    pub chapters: Vec<(ChapterRef, ChapterState)>,
    pub entities: Vec<Entity>,
    pub assignments: Vec<Assignment>,
    pub merge_suggestions: Vec<MergeSuggestion>,
    /// Current view, after redirects and reassignments.
    pub assertions: Vec<AttributeAssertion>,
    pub anchors: Vec<AnchorRecord>,
    /// Full append-only log, for audit.
    pub ledger_events: Vec<LedgerEvent>,
    pub conflicts: Vec<ConflictRecord>,
}
