//! Replay of the ledger log into the current view.
//!
//! Algorithm:
//! 1. Collect recorded facts, dropping those of chapters retired afterwards.
//! 2. Collect entity redirects and per-mention reassignments.
//! 3. Rewrite each fact's entity: mention reassignment first, then follow
//!    redirects to the surviving entity.
//! 4. Order facts in discourse order (chapter, span start, id).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lore_core::models::{
    AnchorId, AnchorRecord, AssertionId, AttributeAssertion, ChapterRef, EntityId, FactSource,
    MentionRef,
};

use crate::events::LedgerEvent;

/// Current facts with effective entity ids applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    assertions: Vec<AttributeAssertion>,
    anchors: Vec<AnchorRecord>,
}

/// Everything recorded for one entity, in discourse order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFacts {
    pub entity: EntityId,
    pub assertions: Vec<AttributeAssertion>,
    pub anchors: Vec<AnchorRecord>,
}

impl EntityFacts {
    fn empty(entity: EntityId) -> Self {
        Self {
            entity,
            assertions: Vec::new(),
            anchors: Vec::new(),
        }
    }

    /// Attribute names in sorted order.
    pub fn attributes(&self) -> BTreeSet<&str> {
        self.assertions.iter().map(|a| a.attribute.as_str()).collect()
    }

    pub fn for_attribute<'a>(
        &'a self,
        attribute: &'a str,
    ) -> impl Iterator<Item = &'a AttributeAssertion> + 'a {
        self.assertions
            .iter()
            .filter(move |a| a.attribute == attribute)
    }
}

impl LedgerSnapshot {
    pub fn assertions(&self) -> &[AttributeAssertion] {
        &self.assertions
    }

    pub fn anchors(&self) -> &[AnchorRecord] {
        &self.anchors
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty() && self.anchors.is_empty()
    }

    pub fn entities(&self) -> BTreeSet<EntityId> {
        self.assertions
            .iter()
            .map(|a| a.entity)
            .chain(self.anchors.iter().map(|a| a.entity))
            .collect()
    }

    pub fn facts_for(&self, entity: EntityId) -> EntityFacts {
        EntityFacts {
            entity,
            assertions: self
                .assertions
                .iter()
                .filter(|a| a.entity == entity)
                .cloned()
                .collect(),
            anchors: self
                .anchors
                .iter()
                .filter(|a| a.entity == entity)
                .cloned()
                .collect(),
        }
    }

    /// Facts partitioned per entity, in entity id order.
    pub fn by_entity(&self) -> Vec<EntityFacts> {
        let mut grouped: BTreeMap<EntityId, EntityFacts> = BTreeMap::new();
        for assertion in &self.assertions {
            grouped
                .entry(assertion.entity)
                .or_insert_with(|| EntityFacts::empty(assertion.entity))
                .assertions
                .push(assertion.clone());
        }
        for anchor in &self.anchors {
            grouped
                .entry(anchor.entity)
                .or_insert_with(|| EntityFacts::empty(anchor.entity))
                .anchors
                .push(anchor.clone());
        }
        grouped.into_values().collect()
    }
}

fn follow(redirects: &BTreeMap<EntityId, EntityId>, mut id: EntityId) -> EntityId {
    let mut hops = 0;
    while let Some(next) = redirects.get(&id) {
        if hops > redirects.len() {
            tracing::warn!(entity = %id, "redirect cycle in ledger");
            break;
        }
        id = *next;
        hops += 1;
    }
    id
}

fn discourse_key(source: &FactSource) -> (ChapterRef, usize) {
    (source.chapter, source.span.start)
}

pub(crate) fn replay(events: &[LedgerEvent]) -> LedgerSnapshot {
    let mut assertions: BTreeMap<AssertionId, AttributeAssertion> = BTreeMap::new();
    let mut anchors: BTreeMap<AnchorId, AnchorRecord> = BTreeMap::new();
    let mut redirects: BTreeMap<EntityId, EntityId> = BTreeMap::new();
    let mut overrides: BTreeMap<MentionRef, EntityId> = BTreeMap::new();

    for event in events {
        match event {
            LedgerEvent::AssertionRecorded(a) => {
                assertions.insert(a.id, a.clone());
            }
            LedgerEvent::AnchorRecorded(a) => {
                anchors.insert(a.id, a.clone());
            }
            LedgerEvent::ChapterRetired { chapter } => {
                assertions.retain(|_, a| a.source.chapter != *chapter);
                anchors.retain(|_, a| a.source.chapter != *chapter);
                overrides.retain(|m, _| m.chapter != *chapter);
            }
            LedgerEvent::EntityRedirected { from, to } => {
                redirects.insert(*from, *to);
            }
            LedgerEvent::MentionReassigned { mention, entity } => {
                overrides.insert(*mention, *entity);
            }
        }
    }

    let effective = |entity: EntityId, mention: &MentionRef| {
        follow(&redirects, overrides.get(mention).copied().unwrap_or(entity))
    };

    let mut assertions: Vec<AttributeAssertion> = assertions
        .into_values()
        .map(|mut a| {
            let entity = effective(a.entity, &a.source.mention);
            a.entity = entity;
            a.instance.entity = entity;
            a
        })
        .collect();
    assertions.sort_by_key(|a| (discourse_key(&a.source), a.id));

    let mut anchors: Vec<AnchorRecord> = anchors
        .into_values()
        .map(|mut a| {
            let entity = effective(a.entity, &a.source.mention);
            a.entity = entity;
            a.instance.entity = entity;
            a
        })
        .collect();
    anchors.sort_by_key(|a| (discourse_key(&a.source), a.id));

    LedgerSnapshot {
        assertions,
        anchors,
    }
}
