use serde::{Deserialize, Serialize};
use std::fmt;

use super::chapter::{ChapterRef, Span};
use super::ids::EntityId;
use super::mention::{MentionRef, MentionSource};
use crate::confidence::Confidence;

/// What kind of inconsistency a conflict reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Incompatible categorical values at comparable instants.
    Attribute,
    /// Age delta does not match elapsed story time.
    AgeProgression,
    /// Regression of age or life phase in discourse order.
    Timeline,
    /// (year, age) pairs imply incompatible birth years.
    BirthYear,
}

impl ConflictType {
    pub const ALL: [ConflictType; 4] = [
        ConflictType::Attribute,
        ConflictType::AgeProgression,
        ConflictType::Timeline,
        ConflictType::BirthYear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::AgeProgression => "age_progression",
            Self::Timeline => "timeline",
            Self::BirthYear => "birth_year",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity rank. Serialized as its number (1 critical .. 3 speculative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Critical = 1,
    Medium = 2,
    Speculative = 3,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Critical, Tier::Medium, Tier::Speculative];

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Critical),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Speculative),
            other => Err(format!("tier must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.number()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Operator-controlled status of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    #[default]
    Unresolved,
    Resolved,
    Dismissed,
}

impl ConflictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for ConflictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-hash identifier of a conflict. Stable across re-detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictId(pub String);

impl ConflictId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConflictId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One fact a conflict points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub chapter: ChapterRef,
    pub span: Span,
    pub mention: MentionRef,
    /// Attribute value, or the anchor itself for timeline evidence.
    pub value: String,
    /// Bare anchor the fact was asserted at.
    pub anchor: String,
    pub confidence: Confidence,
    pub source: MentionSource,
}

/// A detected inconsistency between two or more facts about one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: ConflictId,
    pub conflict_type: ConflictType,
    pub entity: EntityId,
    pub entity_name: String,
    pub attribute: String,
    pub evidence: Vec<Evidence>,
    /// Chapter where the contradiction surfaces (latest evidence).
    pub chapter: ChapterRef,
    pub tier: Tier,
    pub confidence: Confidence,
    pub description: String,
}

impl Conflict {
    /// Build a conflict, sorting evidence into narrative order and deriving
    /// the id and chapter locator from it.
    pub fn new(
        conflict_type: ConflictType,
        entity: EntityId,
        entity_name: impl Into<String>,
        attribute: impl Into<String>,
        mut evidence: Vec<Evidence>,
        tier: Tier,
        description: impl Into<String>,
    ) -> Self {
        evidence.sort_by(|a, b| {
            (a.chapter, a.span, &a.value, &a.anchor).cmp(&(b.chapter, b.span, &b.value, &b.anchor))
        });
        let attribute = attribute.into();
        let id = content_id(conflict_type, &attribute, &evidence);
        let chapter = evidence
            .last()
            .map(|e| e.chapter)
            .unwrap_or(ChapterRef::new(0, 0));
        let confidence = evidence
            .iter()
            .map(|e| e.confidence)
            .reduce(Confidence::min)
            .unwrap_or_default();
        Self {
            id,
            conflict_type,
            entity,
            entity_name: entity_name.into(),
            attribute,
            evidence,
            chapter,
            tier,
            confidence,
            description: description.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.tier == Tier::Critical
    }
}

/// blake3 over the conflict type, attribute and evidence locators.
/// Entity ids are excluded so ids survive roster renumbering.
fn content_id(conflict_type: ConflictType, attribute: &str, evidence: &[Evidence]) -> ConflictId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(conflict_type.as_str().as_bytes());
    hasher.update(b"\x1f");
    hasher.update(attribute.as_bytes());
    for e in evidence {
        hasher.update(b"\x1e");
        hasher.update(e.chapter.to_string().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(e.span.to_string().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(e.value.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(e.anchor.as_bytes());
    }
    let hex = hasher.finalize().to_hex();
    ConflictId(hex.as_str()[..16].to_string())
}
