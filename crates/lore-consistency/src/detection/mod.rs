//! Detection strategy registry.
//!
//! Four strategies run over one entity's facts. Each returns every conflict
//! it finds; the engine deduplicates by content id.

pub mod age_progression;
pub mod attribute;
pub mod birth_year;
pub mod timeline;

use lore_core::models::Conflict;
use lore_ledger::EntityFacts;

use crate::rules::DetectionRules;
use crate::timeline_context::EntityTimeline;

/// Everything a strategy needs about one entity.
pub struct EntityScope<'a> {
    pub facts: &'a EntityFacts,
    pub name: &'a str,
    pub timeline: &'a EntityTimeline,
    pub rules: &'a DetectionRules,
}

/// Run all strategies against one entity.
pub fn detect_all(scope: &EntityScope<'_>) -> Vec<Conflict> {
    let mut conflicts = attribute::detect(scope);
    conflicts.extend(age_progression::detect(scope));
    conflicts.extend(timeline::detect(scope));
    conflicts.extend(birth_year::detect(scope));
    conflicts
}
