//! Categorical attribute contradictions.

use lore_core::models::{AttributeAssertion, Conflict, ConflictType, Tier};
use lore_temporal::{compare, Comparison};

use super::EntityScope;
use crate::evidence;
use crate::rules::AttributePolicy;
use crate::tiering::{assign_tier, TierSignals};

/// Flag pairs of non-equivalent values whose instants are comparable:
/// any ordering for immutable attributes, a shared instant for mutable ones.
pub fn detect(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for attribute in scope.facts.attributes() {
        let policy = scope.rules.policy(attribute);
        if policy == AttributePolicy::Continuous {
            continue;
        }
        let assertions: Vec<&AttributeAssertion> = scope.facts.for_attribute(attribute).collect();
        for (i, a) in assertions.iter().enumerate() {
            for b in &assertions[i + 1..] {
                if let Some(conflict) = check_pair(scope, policy, attribute, a, b) {
                    conflicts.push(conflict);
                }
            }
        }
    }
    conflicts
}

fn check_pair(
    scope: &EntityScope<'_>,
    policy: AttributePolicy,
    attribute: &str,
    a: &AttributeAssertion,
    b: &AttributeAssertion,
) -> Option<Conflict> {
    if scope.rules.equivalence.equivalent(&a.value, &b.value) {
        return None;
    }
    let outcome = compare(&a.instance, &b.instance, &scope.timeline.context);
    let conflicting = match policy {
        AttributePolicy::Immutable => outcome.is_comparable(),
        _ => outcome.may_coincide(),
    };
    if !conflicting {
        return None;
    }

    let evidence = vec![evidence::from_assertion(a), evidence::from_assertion(b)];
    let signals = TierSignals {
        basis: outcome.basis(),
        overlapping: matches!(outcome, Comparison::Overlapping { .. }),
        weak_instance: a.instance.low_confidence || b.instance.low_confidence,
    };
    let tier = assign_tier(
        Tier::Critical,
        &evidence,
        signals,
        scope.rules.high_confidence,
    );
    let description = format!(
        "{}: {} is \"{}\" at {} ({}) but \"{}\" at {} ({})",
        scope.name,
        attribute,
        a.value,
        a.instance.anchor,
        a.source.chapter,
        b.value,
        b.instance.anchor,
        b.source.chapter,
    );
    Some(Conflict::new(
        ConflictType::Attribute,
        scope.facts.entity,
        scope.name,
        attribute,
        evidence,
        tier,
        description,
    ))
}
