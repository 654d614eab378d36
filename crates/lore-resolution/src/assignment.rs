use serde::{Deserialize, Serialize};

use lore_core::errors::ResolutionError;
use lore_core::models::{ChapterRef, EntityId, MentionKind, MentionRef, MentionSource};
use lore_core::Confidence;

/// Which rule produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Surface form equals an existing alias.
    ExactAlias,
    /// Mention tokens are a strict subset of an alias ("Juan" → "Juan García").
    TokenSubset,
    /// An alias is a strict subset of the mention ("Juan García" → "Juan").
    TokenSuperset,
    /// No match: the mention started a new entity.
    NewEntity,
    /// Several candidates tied; nothing attached.
    Unresolved,
    /// Set by an operator correction.
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Accepted,
    NeedsReview,
    Confirmed,
}

/// The entity a mention was attached to, and how sure the resolver is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub mention: MentionRef,
    pub surface: String,
    pub kind: MentionKind,
    pub source: MentionSource,
    /// `None` when several candidates tie and the mention waits for review.
    pub entity: Option<EntityId>,
    pub rule: MatchRule,
    pub confidence: Confidence,
    pub status: AssignmentStatus,
    /// Entities the operator should choose between when under review.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<EntityId>,
}

impl Assignment {
    pub fn needs_review(&self) -> bool {
        self.status == AssignmentStatus::NeedsReview
    }

    /// Why the assignment is under review.
    pub fn review_reason(&self) -> Option<ResolutionError> {
        self.needs_review()
            .then(|| ResolutionError::AmbiguousResolution {
                mention: self.mention,
                candidates: self.candidates.clone(),
            })
    }
}

/// Cross-book partial-name collision left for the operator to confirm.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MergeSuggestion {
    /// The newer entity.
    pub entity: EntityId,
    /// The existing entity from another book it may be the same as.
    pub candidate: EntityId,
    pub reason: String,
}

/// Result of resolving one chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterResolution {
    pub chapter: Option<ChapterRef>,
    pub assignments: Vec<Assignment>,
    pub created: Vec<EntityId>,
    pub suggestions: Vec<MergeSuggestion>,
    /// Tagger-backed names accepted in this chapter, for gazetteer feedback.
    pub confirmed_terms: Vec<(String, MentionKind)>,
}

impl ChapterResolution {
    pub fn review_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.needs_review()).count()
    }
}

/// Mentions moved out of an entity by an operator split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutcome {
    pub from: EntityId,
    pub new_entity: EntityId,
    pub moved: Vec<MentionRef>,
}
