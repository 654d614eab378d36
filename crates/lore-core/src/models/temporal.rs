use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::EntityId;

/// Fixed life-stage sequence: child < teen < young < adult < elder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifePhase {
    Child,
    Teen,
    Young,
    Adult,
    Elder,
}

impl LifePhase {
    pub const ALL: [LifePhase; 5] = [
        LifePhase::Child,
        LifePhase::Teen,
        LifePhase::Young,
        LifePhase::Adult,
        LifePhase::Elder,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Young => "young",
            Self::Adult => "adult",
            Self::Elder => "elder",
        }
    }

    /// Age range (inclusive) the phase plausibly covers. Ranges overlap.
    pub fn age_range(self) -> (u32, u32) {
        match self {
            Self::Child => (0, 14),
            Self::Teen => (11, 21),
            Self::Young => (17, 40),
            Self::Adult => (30, 70),
            Self::Elder => (55, 130),
        }
    }
}

impl FromStr for LifePhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

/// A self-relative phase marker that needs an explicit reference to be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeMarker {
    FutureSelf,
    PastSelf,
}

impl RelativeMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FutureSelf => "future_self",
            Self::PastSelf => "past_self",
        }
    }
}

/// The four anchor kinds. `phase` covers both life stages and relative markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Age,
    Year,
    Phase,
    Offset,
}

impl TemporalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Year => "year",
            Self::Phase => "phase",
            Self::Offset => "offset",
        }
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "When" in story-time a fact holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemporalAnchor {
    /// Age in whole years.
    Age(u32),
    /// Absolute calendar year.
    Year(i32),
    Phase(LifePhase),
    /// `future_self` / `past_self`, optionally pinned to a reference anchor.
    Relative {
        marker: RelativeMarker,
        reference: Option<Box<TemporalAnchor>>,
    },
    /// Signed years relative to a reference event (unstated when `None`).
    Offset {
        years: i64,
        reference: Option<String>,
    },
}

impl TemporalAnchor {
    pub fn kind(&self) -> TemporalKind {
        match self {
            Self::Age(_) => TemporalKind::Age,
            Self::Year(_) => TemporalKind::Year,
            Self::Phase(_) | Self::Relative { .. } => TemporalKind::Phase,
            Self::Offset { .. } => TemporalKind::Offset,
        }
    }
}

impl fmt::Display for TemporalAnchor {
    /// Bare token form: `age:30`, `phase:future_self/age:30`, `offset:+5/battle`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Age(age) => write!(f, "age:{age}"),
            Self::Year(year) => write!(f, "year:{year}"),
            Self::Phase(phase) => write!(f, "phase:{}", phase.as_str()),
            Self::Relative { marker, reference } => {
                write!(f, "phase:{}", marker.as_str())?;
                if let Some(reference) = reference {
                    write!(f, "/{reference}")?;
                }
                Ok(())
            }
            Self::Offset { years, reference } => {
                write!(f, "offset:{years:+}")?;
                if let Some(reference) = reference {
                    write!(f, "/{reference}")?;
                }
                Ok(())
            }
        }
    }
}

/// A validated anchor scoped to one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalInstance {
    pub entity: EntityId,
    pub anchor: TemporalAnchor,
    /// Set when an offset exceeds a human lifespan.
    #[serde(default)]
    pub low_confidence: bool,
}

impl TemporalInstance {
    pub fn new(entity: EntityId, anchor: TemporalAnchor) -> Self {
        Self {
            entity,
            anchor,
            low_confidence: false,
        }
    }

    pub fn kind(&self) -> TemporalKind {
        self.anchor.kind()
    }
}

impl fmt::Display for TemporalInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.entity, self.anchor)
    }
}
