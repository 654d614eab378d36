//! Ordering of temporal instances.
//!
//! `compare` is a total function over every pair of anchor kinds. Pairs that
//! cannot be ordered without guessing return [`Comparison::Incomparable`];
//! callers must never derive a conflict from those.

use std::cmp::Ordering;

use lore_core::constants::CHAPTER_REFERENCE_PREFIX;
use lore_core::models::{RelativeMarker, TemporalAnchor, TemporalInstance};
use serde::{Deserialize, Serialize};

use crate::context::TimelineContext;

/// How an ordering was established. Earlier variants are stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonBasis {
    /// Same axis, explicit values (age vs age, year vs year).
    Exact,
    /// Offsets against a shared or declared reference event.
    ReferenceEvent,
    /// Age joined to year through a birth year stated in the text.
    DeclaredBirthYear,
    /// Life-phase partial order.
    PhaseOrder,
    /// Age joined to year through an inferred birth year.
    InferredBirthYear,
    /// Two unanchored facts of the same chapter.
    ChapterLocal,
}

impl ComparisonBasis {
    /// Whether the ordering holds without any inference step.
    pub fn is_unambiguous(self) -> bool {
        matches!(
            self,
            Self::Exact | Self::ReferenceEvent | Self::DeclaredBirthYear
        )
    }

    fn weaker(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Why two instances could not be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomparableReason {
    DifferentEntities,
    /// An offset with no reference event.
    UnreferencedOffset,
    /// Offsets or chapter-local facts against different references.
    DifferentReference,
    /// Age against year with no birth-year anchor.
    MissingBirthYear,
    /// `future_self`/`past_self` with no reference instance.
    RelativeWithoutReference,
    /// Kinds with no shared axis (e.g. phase against year).
    KindMismatch,
    /// An offset that does not fit on the calendar axis.
    OutOfRange,
}

/// Outcome of comparing two instances of the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Comparison {
    Before { basis: ComparisonBasis },
    Same { basis: ComparisonBasis },
    After { basis: ComparisonBasis },
    /// Same life phase: the instants may or may not coincide.
    Overlapping { basis: ComparisonBasis },
    Incomparable { reason: IncomparableReason },
}

impl Comparison {
    fn ordered(order: Ordering, basis: ComparisonBasis) -> Self {
        match order {
            Ordering::Less => Self::Before { basis },
            Ordering::Equal => Self::Same { basis },
            Ordering::Greater => Self::After { basis },
        }
    }

    fn incomparable(reason: IncomparableReason) -> Self {
        Self::Incomparable { reason }
    }

    pub fn is_comparable(&self) -> bool {
        !matches!(self, Self::Incomparable { .. })
    }

    pub fn is_same(&self) -> bool {
        matches!(self, Self::Same { .. })
    }

    /// Same instant or possibly the same instant.
    pub fn may_coincide(&self) -> bool {
        matches!(self, Self::Same { .. } | Self::Overlapping { .. })
    }

    pub fn basis(&self) -> Option<ComparisonBasis> {
        match self {
            Self::Before { basis }
            | Self::Same { basis }
            | Self::After { basis }
            | Self::Overlapping { basis } => Some(*basis),
            Self::Incomparable { .. } => None,
        }
    }

    /// The comparison seen from the other side.
    pub fn reverse(self) -> Self {
        match self {
            Self::Before { basis } => Self::After { basis },
            Self::After { basis } => Self::Before { basis },
            other => other,
        }
    }
}

/// A value on one of the linear story-time axes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Axis {
    Age,
    Calendar,
    Event(String),
    Local(String),
}

#[derive(Debug, Clone)]
struct Position {
    axis: Axis,
    value: i64,
    basis: ComparisonBasis,
}

#[derive(Debug, Clone)]
enum Resolved {
    Linear(Position),
    Phase(u8),
    Relative {
        marker: RelativeMarker,
        reference: Box<Resolved>,
    },
    Unresolved(IncomparableReason),
}

fn resolve(anchor: &TemporalAnchor, ctx: &TimelineContext) -> Resolved {
    match anchor {
        TemporalAnchor::Age(age) => Resolved::Linear(Position {
            axis: Axis::Age,
            value: i64::from(*age),
            basis: ComparisonBasis::Exact,
        }),
        TemporalAnchor::Year(year) => Resolved::Linear(Position {
            axis: Axis::Calendar,
            value: i64::from(*year),
            basis: ComparisonBasis::Exact,
        }),
        TemporalAnchor::Phase(phase) => Resolved::Phase(phase.rank()),
        TemporalAnchor::Relative { marker, reference } => match reference {
            Some(reference) => Resolved::Relative {
                marker: *marker,
                reference: Box::new(resolve(reference, ctx)),
            },
            None => Resolved::Unresolved(IncomparableReason::RelativeWithoutReference),
        },
        TemporalAnchor::Offset { years, reference } => match reference {
            None => Resolved::Unresolved(IncomparableReason::UnreferencedOffset),
            Some(label) if label.starts_with(CHAPTER_REFERENCE_PREFIX) => {
                Resolved::Linear(Position {
                    axis: Axis::Local(label.clone()),
                    value: *years,
                    basis: ComparisonBasis::ChapterLocal,
                })
            }
            Some(label) => match ctx.event_year(label) {
                Some(year) => match i64::from(year).checked_add(*years) {
                    Some(value) => Resolved::Linear(Position {
                        axis: Axis::Calendar,
                        value,
                        basis: ComparisonBasis::ReferenceEvent,
                    }),
                    None => Resolved::Unresolved(IncomparableReason::OutOfRange),
                },
                None => Resolved::Linear(Position {
                    axis: Axis::Event(label.clone()),
                    value: *years,
                    basis: ComparisonBasis::ReferenceEvent,
                }),
            },
        },
    }
}

/// Bring two positions onto one axis. Ages convert to calendar years through
/// the birth year when the other side is calendar-based.
fn align(
    a: &Position,
    b: &Position,
    ctx: &TimelineContext,
) -> Result<(i64, i64, ComparisonBasis), IncomparableReason> {
    let basis = a.basis.weaker(b.basis);
    if a.axis == b.axis {
        return Ok((a.value, b.value, basis));
    }
    match (&a.axis, &b.axis) {
        (Axis::Age, Axis::Calendar) | (Axis::Calendar, Axis::Age) => {
            let birth = ctx.birth_year.ok_or(IncomparableReason::MissingBirthYear)?;
            let birth_basis = if birth.declared {
                ComparisonBasis::DeclaredBirthYear
            } else {
                ComparisonBasis::InferredBirthYear
            };
            let to_calendar = |p: &Position| match p.axis {
                Axis::Age => i64::from(birth.year)
                    .checked_add(p.value)
                    .ok_or(IncomparableReason::OutOfRange),
                _ => Ok(p.value),
            };
            Ok((to_calendar(a)?, to_calendar(b)?, basis.weaker(birth_basis)))
        }
        _ => Err(IncomparableReason::DifferentReference),
    }
}

fn compare_resolved(a: &Resolved, b: &Resolved, ctx: &TimelineContext) -> Comparison {
    match (a, b) {
        (Resolved::Unresolved(reason), _) | (_, Resolved::Unresolved(reason)) => {
            Comparison::incomparable(*reason)
        }
        (Resolved::Linear(pa), Resolved::Linear(pb)) => match align(pa, pb, ctx) {
            Ok((va, vb, basis)) => Comparison::ordered(va.cmp(&vb), basis),
            Err(reason) => Comparison::incomparable(reason),
        },
        (Resolved::Phase(ra), Resolved::Phase(rb)) => {
            if ra == rb {
                Comparison::Overlapping {
                    basis: ComparisonBasis::PhaseOrder,
                }
            } else {
                Comparison::ordered(ra.cmp(rb), ComparisonBasis::PhaseOrder)
            }
        }
        (Resolved::Relative { marker, reference }, other) => {
            compare_relative(*marker, reference, other, ctx)
        }
        (other, Resolved::Relative { marker, reference }) => {
            compare_relative(*marker, reference, other, ctx).reverse()
        }
        _ => Comparison::incomparable(IncomparableReason::KindMismatch),
    }
}

/// `future_self` of R is strictly after anything at or before R;
/// `past_self` of R is strictly before anything at or after R.
fn compare_relative(
    marker: RelativeMarker,
    reference: &Resolved,
    other: &Resolved,
    ctx: &TimelineContext,
) -> Comparison {
    if matches!(other, Resolved::Relative { .. }) {
        return Comparison::incomparable(IncomparableReason::RelativeWithoutReference);
    }
    let versus_reference = compare_resolved(other, reference, ctx);
    let basis = match versus_reference.basis() {
        Some(basis) => basis,
        None => return versus_reference,
    };
    match (marker, versus_reference) {
        (RelativeMarker::FutureSelf, Comparison::Before { .. } | Comparison::Same { .. }) => {
            Comparison::After { basis }
        }
        (RelativeMarker::PastSelf, Comparison::After { .. } | Comparison::Same { .. }) => {
            Comparison::Before { basis }
        }
        _ => Comparison::incomparable(IncomparableReason::RelativeWithoutReference),
    }
}

/// Order two instances of the same entity.
pub fn compare(a: &TemporalInstance, b: &TemporalInstance, ctx: &TimelineContext) -> Comparison {
    if a.entity != b.entity {
        return Comparison::incomparable(IncomparableReason::DifferentEntities);
    }
    compare_resolved(&resolve(&a.anchor, ctx), &resolve(&b.anchor, ctx), ctx)
}

/// A story-time axis that positions on it can be totally ordered along.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "axis", content = "reference", rename_all = "snake_case")]
pub enum StoryAxis {
    /// Age with no birth year to place it on the calendar.
    Age,
    Calendar,
    /// Offsets against an undeclared reference event.
    Event(String),
    /// Unanchored facts of one chapter (`ch:B.C`).
    ChapterLocal(String),
    /// Life-phase rank; equal ranks overlap.
    Phase,
}

/// Where an instance sits on a story-time axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryPosition {
    pub axis: StoryAxis,
    pub value: i64,
}

/// Place an instance on a linear axis. Ages move to the calendar when the
/// context has a birth year. Relative markers and unresolvable anchors have
/// no position.
pub fn story_position(instance: &TemporalInstance, ctx: &TimelineContext) -> Option<StoryPosition> {
    match resolve(&instance.anchor, ctx) {
        Resolved::Linear(Position { axis, value, .. }) => match axis {
            Axis::Age => match ctx.birth_year {
                Some(birth) => Some(StoryPosition {
                    axis: StoryAxis::Calendar,
                    value: i64::from(birth.year).checked_add(value)?,
                }),
                None => Some(StoryPosition {
                    axis: StoryAxis::Age,
                    value,
                }),
            },
            Axis::Calendar => Some(StoryPosition {
                axis: StoryAxis::Calendar,
                value,
            }),
            Axis::Event(label) => Some(StoryPosition {
                axis: StoryAxis::Event(label),
                value,
            }),
            Axis::Local(label) => Some(StoryPosition {
                axis: StoryAxis::ChapterLocal(label),
                value,
            }),
        },
        Resolved::Phase(rank) => Some(StoryPosition {
            axis: StoryAxis::Phase,
            value: i64::from(rank),
        }),
        Resolved::Relative { .. } | Resolved::Unresolved(_) => None,
    }
}

/// Story-time years elapsed from `a` to `b`, when both sit on a linear axis
/// and the distance fits in an `i64`.
pub fn elapsed_years(
    a: &TemporalInstance,
    b: &TemporalInstance,
    ctx: &TimelineContext,
) -> Option<(i64, ComparisonBasis)> {
    if a.entity != b.entity {
        return None;
    }
    match (resolve(&a.anchor, ctx), resolve(&b.anchor, ctx)) {
        (Resolved::Linear(pa), Resolved::Linear(pb)) => {
            let (va, vb, basis) = align(&pa, &pb, ctx).ok()?;
            Some((vb.checked_sub(va)?, basis))
        }
        _ => None,
    }
}
