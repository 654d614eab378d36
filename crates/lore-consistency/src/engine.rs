//! Detection entry point over a whole ledger snapshot.

use std::collections::BTreeMap;

use rayon::prelude::*;

use lore_core::config::{ConsistencyConfig, LoreConfig, TemporalConfig};
use lore_core::models::{AttributeAssertion, Conflict, EntityId};
use lore_ledger::{EntityFacts, LedgerSnapshot};

use crate::detection::{detect_all, EntityScope};
use crate::rules::DetectionRules;
use crate::story_order::in_story_order;
use crate::timeline_context::build_timeline;

/// Runs every detection strategy over every entity in a snapshot.
///
/// Detection is a pure function of the snapshot, the entity names and the
/// reference events: the same inputs always give the same conflicts in the
/// same order.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyDetector {
    rules: DetectionRules,
}

impl ConsistencyDetector {
    pub fn new(consistency: &ConsistencyConfig, temporal: &TemporalConfig) -> Self {
        Self {
            rules: DetectionRules::from_config(consistency, temporal),
        }
    }

    pub fn from_config(config: &LoreConfig) -> Self {
        Self::new(&config.consistency, &config.temporal)
    }

    pub fn rules(&self) -> &DetectionRules {
        &self.rules
    }

    /// Detect conflicts for every entity, ordered and deduplicated by id.
    pub fn detect(
        &self,
        snapshot: &LedgerSnapshot,
        names: &BTreeMap<EntityId, String>,
        reference_events: &BTreeMap<String, i32>,
    ) -> Vec<Conflict> {
        let groups = snapshot.by_entity();
        let mut conflicts: Vec<Conflict> = groups
            .par_iter()
            .flat_map_iter(|facts| {
                let name = display_name(names, facts.entity);
                self.detect_entity(facts, &name, reference_events)
            })
            .collect();
        conflicts.sort_by(|a, b| a.id.cmp(&b.id));
        conflicts.dedup_by(|a, b| a.id == b.id);
        tracing::debug!(
            entities = groups.len(),
            conflicts = conflicts.len(),
            "consistency detection finished"
        );
        conflicts
    }

    /// Detect conflicts for a single entity's facts.
    pub fn detect_entity(
        &self,
        facts: &EntityFacts,
        name: &str,
        reference_events: &BTreeMap<String, i32>,
    ) -> Vec<Conflict> {
        let timeline = build_timeline(facts, reference_events, &self.rules);
        let scope = EntityScope {
            facts,
            name,
            timeline: &timeline,
            rules: &self.rules,
        };
        detect_all(&scope)
    }

    /// One attribute of one entity, ordered by story time where the
    /// instants compare (birth year and reference events applied), by
    /// discourse otherwise.
    pub fn attribute_history(
        &self,
        facts: &EntityFacts,
        attribute: &str,
        reference_events: &BTreeMap<String, i32>,
    ) -> Vec<AttributeAssertion> {
        let timeline = build_timeline(facts, reference_events, &self.rules);
        in_story_order(facts, attribute, &timeline.context)
            .into_iter()
            .cloned()
            .collect()
    }
}

fn display_name(names: &BTreeMap<EntityId, String>, entity: EntityId) -> String {
    names
        .get(&entity)
        .cloned()
        .unwrap_or_else(|| format!("entity {entity}"))
}
