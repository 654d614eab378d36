use serde::{Deserialize, Serialize};

use super::chapter::{ChapterRef, Span};
use super::ids::{AnchorId, AssertionId, EntityId};
use super::mention::{MentionRef, MentionSource};
use super::temporal::TemporalInstance;
use crate::confidence::Confidence;

/// Provenance of a recorded fact: the mention it was attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactSource {
    pub mention: MentionRef,
    pub chapter: ChapterRef,
    /// Span of the annotation that carried the fact.
    pub span: Span,
    pub origin: MentionSource,
    /// The chapter is an analepsis.
    #[serde(default)]
    pub flashback: bool,
}

/// An attribute value recorded for an entity at one temporal instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeAssertion {
    pub id: AssertionId,
    pub entity: EntityId,
    pub attribute: String,
    pub value: String,
    pub instance: TemporalInstance,
    pub source: FactSource,
    pub confidence: Confidence,
}

/// A bare temporal anchor recorded for an entity (no attribute attached).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub id: AnchorId,
    pub entity: EntityId,
    pub instance: TemporalInstance,
    pub source: FactSource,
    pub confidence: Confidence,
}
