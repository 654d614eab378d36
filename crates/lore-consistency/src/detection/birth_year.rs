//! Birth-year consistency.
//!
//! Every (year, age) observation implies a birth year; a declared
//! `birth_year` counts as one more sample. When the implied years spread
//! wider than `birth_year_max_spread`, the extreme samples conflict.

use lore_core::constants::BIRTH_YEAR_ATTRIBUTE;
use lore_core::models::{Conflict, ConflictType, Evidence, Tier};

use super::EntityScope;
use crate::tiering::{assign_tier, TierSignals};

struct Sample {
    implied: i64,
    evidence: Vec<Evidence>,
}

pub fn detect(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut samples: Vec<Sample> = scope
        .timeline
        .observations
        .iter()
        .map(|o| Sample {
            implied: o.implied(),
            evidence: o.evidence.clone(),
        })
        .collect();
    if let Some((year, evidence)) = &scope.timeline.declared {
        samples.push(Sample {
            implied: i64::from(*year),
            evidence: vec![evidence.clone()],
        });
    }
    if samples.len() < 2 {
        return Vec::new();
    }

    let (Some(low), Some(high)) = (
        samples.iter().min_by_key(|s| s.implied),
        samples.iter().max_by_key(|s| s.implied),
    ) else {
        return Vec::new();
    };
    let spread = high.implied - low.implied;
    if spread <= i64::from(scope.rules.birth_year_max_spread) {
        return Vec::new();
    }

    let mut evidence = low.evidence.clone();
    for item in &high.evidence {
        if !evidence.contains(item) {
            evidence.push(item.clone());
        }
    }
    let tier = assign_tier(
        Tier::Critical,
        &evidence,
        TierSignals::default(),
        scope.rules.high_confidence,
    );
    let description = format!(
        "{}: stated ages imply birth years from {} to {}, {} years apart",
        scope.name, low.implied, high.implied, spread
    );
    vec![Conflict::new(
        ConflictType::BirthYear,
        scope.facts.entity,
        scope.name,
        BIRTH_YEAR_ATTRIBUTE,
        evidence,
        tier,
        description,
    )]
}
