//! Continuous attributes against elapsed story time.
//!
//! For two values of the same attribute whose instants sit on a shared
//! axis, the value delta must match the elapsed years within
//! `age_tolerance_years`. Values that merely differ are not a conflict.

use lore_core::models::{AttributeAssertion, Conflict, ConflictType, Tier};
use lore_temporal::elapsed_years;

use super::EntityScope;
use crate::evidence;
use crate::rules::AttributePolicy;
use crate::tiering::{assign_tier, TierSignals};

pub fn detect(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for attribute in scope.facts.attributes() {
        if scope.rules.policy(attribute) != AttributePolicy::Continuous {
            continue;
        }
        let points: Vec<(&AttributeAssertion, i64)> = scope
            .facts
            .for_attribute(attribute)
            .filter_map(|a| match scope.rules.continuous_value(&a.value) {
                Some(v) => Some((a, i64::from(v))),
                None => {
                    tracing::debug!(
                        entity = %scope.facts.entity,
                        attribute,
                        value = %a.value,
                        "continuous value not a plausible number, skipped"
                    );
                    None
                }
            })
            .collect();

        for (i, (a, va)) in points.iter().enumerate() {
            for (b, vb) in &points[i + 1..] {
                let Some((elapsed, basis)) =
                    elapsed_years(&a.instance, &b.instance, &scope.timeline.context)
                else {
                    continue;
                };
                let Some(drift) = (vb - va).checked_sub(elapsed) else {
                    tracing::debug!(
                        entity = %scope.facts.entity,
                        attribute,
                        elapsed,
                        "elapsed time out of range, pair skipped"
                    );
                    continue;
                };
                if drift.unsigned_abs() <= u64::from(scope.rules.age_tolerance_years) {
                    continue;
                }
                let evidence = vec![evidence::from_assertion(a), evidence::from_assertion(b)];
                let signals = TierSignals {
                    basis: Some(basis),
                    overlapping: false,
                    weak_instance: a.instance.low_confidence || b.instance.low_confidence,
                };
                let tier = assign_tier(
                    Tier::Critical,
                    &evidence,
                    signals,
                    scope.rules.high_confidence,
                );
                let description = format!(
                    "{}: {} goes from {} ({}) to {} ({}) while {} years pass",
                    scope.name, attribute, va, a.source.chapter, vb, b.source.chapter, elapsed
                );
                conflicts.push(Conflict::new(
                    ConflictType::AgeProgression,
                    scope.facts.entity,
                    scope.name,
                    attribute,
                    evidence,
                    tier,
                    description,
                ));
            }
        }
    }
    conflicts
}
