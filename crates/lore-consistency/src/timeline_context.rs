//! Per-entity timeline context: reference events plus a birth-year anchor.
//!
//! The birth year is the declared `birth_year` attribute when present,
//! otherwise the median of `year - age` over:
//! - `age` values asserted at a `year` instance
//! - an age anchor and a year anchor recorded in the same chapter

use std::collections::BTreeMap;

use lore_core::constants::BIRTH_YEAR_ATTRIBUTE;
use lore_core::models::{ChapterRef, Evidence, TemporalAnchor};
use lore_ledger::EntityFacts;
use lore_temporal::{infer_birth_year, BirthYear, BirthYearEstimate, TimelineContext};

use crate::evidence;
use crate::rules::{AttributePolicy, DetectionRules};

/// One observation implying a birth year.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthObservation {
    pub year: i32,
    pub age: u32,
    pub evidence: Vec<Evidence>,
}

impl BirthObservation {
    pub fn implied(&self) -> i64 {
        i64::from(self.year) - i64::from(self.age)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityTimeline {
    pub context: TimelineContext,
    pub declared: Option<(i32, Evidence)>,
    pub observations: Vec<BirthObservation>,
    pub estimate: Option<BirthYearEstimate>,
}

pub fn build_timeline(
    facts: &EntityFacts,
    reference_events: &BTreeMap<String, i32>,
    rules: &DetectionRules,
) -> EntityTimeline {
    let declared = facts
        .for_attribute(BIRTH_YEAR_ATTRIBUTE)
        .find_map(|a| {
            a.value
                .trim()
                .parse::<i32>()
                .ok()
                .map(|year| (year, evidence::from_assertion(a)))
        });

    let mut observations = Vec::new();
    for assertion in &facts.assertions {
        if rules.policy(&assertion.attribute) != AttributePolicy::Continuous {
            continue;
        }
        let TemporalAnchor::Year(year) = assertion.instance.anchor else {
            continue;
        };
        if let Some(age) = rules.continuous_value(&assertion.value) {
            observations.push(BirthObservation {
                year,
                age,
                evidence: vec![evidence::from_assertion(assertion)],
            });
        }
    }

    // First age and first year anchor per chapter.
    let mut per_chapter: BTreeMap<ChapterRef, (Option<(u32, Evidence)>, Option<(i32, Evidence)>)> =
        BTreeMap::new();
    for anchor in &facts.anchors {
        let slot = per_chapter.entry(anchor.source.chapter).or_default();
        match anchor.instance.anchor {
            TemporalAnchor::Age(age) if slot.0.is_none() => {
                slot.0 = Some((age, evidence::from_anchor(anchor)));
            }
            TemporalAnchor::Year(year) if slot.1.is_none() => {
                slot.1 = Some((year, evidence::from_anchor(anchor)));
            }
            _ => {}
        }
    }
    for (age, year) in per_chapter.into_values() {
        if let (Some((age, age_ev)), Some((year, year_ev))) = (age, year) {
            observations.push(BirthObservation {
                year,
                age,
                evidence: vec![year_ev, age_ev],
            });
        }
    }

    let pairs: Vec<(i32, u32)> = observations.iter().map(|o| (o.year, o.age)).collect();
    let estimate = infer_birth_year(&pairs);

    let birth_year = match (&declared, &estimate) {
        (Some((year, _)), _) => Some(BirthYear::declared(*year)),
        (None, Some(estimate)) => Some(BirthYear::inferred(estimate.year)),
        (None, None) => None,
    };
    let mut context = TimelineContext::new().with_reference_events(reference_events.clone());
    context.birth_year = birth_year;

    EntityTimeline {
        context,
        declared,
        observations,
        estimate,
    }
}
