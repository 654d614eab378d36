//! Timeline checks over an entity's own instants.
//!
//! - Age regression: a stated age lower than the previous one in a later
//!   chapter. Flashback chapters are skipped. Pairs whose elapsed time is
//!   known are left to the age-progression check.
//! - Phase regression: an earlier life phase in a later chapter (tier ≥ 2).
//! - Phase/age mismatch: an age outside the phase's range, in one chapter.

use lore_core::models::{
    ChapterRef, Conflict, ConflictType, Evidence, LifePhase, TemporalAnchor, TemporalInstance,
    Tier,
};
use lore_temporal::elapsed_years;

use super::EntityScope;
use crate::evidence;
use crate::rules::AttributePolicy;
use crate::tiering::{assign_tier, TierSignals};

/// Slack around each phase's age range.
pub const PHASE_AGE_TOLERANCE: u32 = 3;

struct AgePoint<'a> {
    age: i64,
    evidence: Evidence,
    flashback: bool,
    /// Instance of an `age` attribute; `None` for bare anchors.
    instance: Option<&'a TemporalInstance>,
}

struct PhasePoint {
    phase: LifePhase,
    evidence: Evidence,
    flashback: bool,
}

pub fn detect(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut conflicts = age_regressions(scope);
    conflicts.extend(phase_regressions(scope));
    conflicts.extend(phase_age_mismatches(scope));
    conflicts
}

fn age_points<'a>(scope: &EntityScope<'a>) -> Vec<AgePoint<'a>> {
    let mut points: Vec<AgePoint<'a>> = scope
        .facts
        .anchors
        .iter()
        .filter_map(|a| match a.instance.anchor {
            TemporalAnchor::Age(age) => Some(AgePoint {
                age: i64::from(age),
                evidence: evidence::from_anchor(a),
                flashback: a.source.flashback,
                instance: None,
            }),
            _ => None,
        })
        .collect();
    points.extend(scope.facts.assertions.iter().filter_map(|a| {
        if scope.rules.policy(&a.attribute) != AttributePolicy::Continuous {
            return None;
        }
        let age = scope.rules.continuous_value(&a.value)?;
        Some(AgePoint {
            age: i64::from(age),
            evidence: evidence::from_assertion(a),
            flashback: a.source.flashback,
            instance: Some(&a.instance),
        })
    }));
    points.sort_by_key(|p| (p.evidence.chapter, p.evidence.span.start));
    points
}

fn age_regressions(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut previous: Option<AgePoint<'_>> = None;
    for point in age_points(scope).into_iter().filter(|p| !p.flashback) {
        if let Some(prev) = &previous {
            let later_chapter = point.evidence.chapter > prev.evidence.chapter;
            let timed = match (prev.instance, point.instance) {
                (Some(a), Some(b)) => {
                    elapsed_years(a, b, &scope.timeline.context).is_some()
                }
                _ => false,
            };
            if later_chapter && !timed && point.age < prev.age {
                let evidence = vec![prev.evidence.clone(), point.evidence.clone()];
                let tier = assign_tier(
                    Tier::Critical,
                    &evidence,
                    TierSignals::default(),
                    scope.rules.high_confidence,
                );
                let description = format!(
                    "{}: age goes back from {} ({}) to {} ({}) without a flashback",
                    scope.name, prev.age, prev.evidence.chapter, point.age, point.evidence.chapter
                );
                conflicts.push(Conflict::new(
                    ConflictType::Timeline,
                    scope.facts.entity,
                    scope.name,
                    "age",
                    evidence,
                    tier,
                    description,
                ));
            }
        }
        previous = Some(point);
    }
    conflicts
}

fn phase_points(scope: &EntityScope<'_>) -> Vec<PhasePoint> {
    scope
        .facts
        .anchors
        .iter()
        .filter_map(|a| match a.instance.anchor {
            TemporalAnchor::Phase(phase) => Some(PhasePoint {
                phase,
                evidence: evidence::from_anchor(a),
                flashback: a.source.flashback,
            }),
            _ => None,
        })
        .collect()
}

fn phase_regressions(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut previous: Option<PhasePoint> = None;
    for point in phase_points(scope).into_iter().filter(|p| !p.flashback) {
        if let Some(prev) = &previous {
            if point.evidence.chapter > prev.evidence.chapter
                && point.phase.rank() < prev.phase.rank()
            {
                let evidence = vec![prev.evidence.clone(), point.evidence.clone()];
                let tier = assign_tier(
                    Tier::Medium,
                    &evidence,
                    TierSignals::default(),
                    scope.rules.high_confidence,
                );
                let description = format!(
                    "{}: life phase goes back from {} ({}) to {} ({}) without a flashback",
                    scope.name,
                    prev.phase.as_str(),
                    prev.evidence.chapter,
                    point.phase.as_str(),
                    point.evidence.chapter
                );
                conflicts.push(Conflict::new(
                    ConflictType::Timeline,
                    scope.facts.entity,
                    scope.name,
                    "phase",
                    evidence,
                    tier,
                    description,
                ));
            }
        }
        previous = Some(point);
    }
    conflicts
}

fn phase_age_mismatches(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let ages: Vec<(u32, ChapterRef, Evidence)> = scope
        .facts
        .anchors
        .iter()
        .filter_map(|a| match a.instance.anchor {
            TemporalAnchor::Age(age) => Some((age, a.source.chapter, evidence::from_anchor(a))),
            _ => None,
        })
        .collect();

    let mut conflicts = Vec::new();
    for phase in phase_points(scope) {
        let (low, high) = phase.phase.age_range();
        let low = low.saturating_sub(PHASE_AGE_TOLERANCE);
        let high = high + PHASE_AGE_TOLERANCE;
        for (age, chapter, age_evidence) in &ages {
            if *chapter != phase.evidence.chapter || (low..=high).contains(age) {
                continue;
            }
            let evidence = vec![phase.evidence.clone(), age_evidence.clone()];
            let tier = assign_tier(
                Tier::Medium,
                &evidence,
                TierSignals::default(),
                scope.rules.high_confidence,
            );
            let description = format!(
                "{}: age {} does not fit life phase {} in {}",
                scope.name,
                age,
                phase.phase.as_str(),
                chapter
            );
            conflicts.push(Conflict::new(
                ConflictType::Timeline,
                scope.facts.entity,
                scope.name,
                "phase",
                evidence,
                tier,
                description,
            ));
        }
    }
    conflicts
}
