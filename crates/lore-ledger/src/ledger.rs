use serde::{Deserialize, Serialize};

use lore_core::models::{
    AnchorId, AnchorRecord, AssertionId, AttributeAssertion, ChapterRef, EntityId, FactSource,
    MentionRef, TemporalInstance,
};
use lore_core::Confidence;

use crate::events::LedgerEvent;
use crate::snapshot::{replay, LedgerSnapshot};

/// The project's attribute ledger. Writes only ever append.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeLedger {
    events: Vec<LedgerEvent>,
    next_assertion: u64,
    next_anchor: u64,
}

impl AttributeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a persisted log.
    pub fn from_events(events: Vec<LedgerEvent>) -> Self {
        let mut next_assertion = 0;
        let mut next_anchor = 0;
        for event in &events {
            match event {
                LedgerEvent::AssertionRecorded(a) => {
                    next_assertion = next_assertion.max(a.id.value());
                }
                LedgerEvent::AnchorRecorded(a) => next_anchor = next_anchor.max(a.id.value()),
                _ => {}
            }
        }
        Self {
            events,
            next_assertion,
            next_anchor,
        }
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn record_assertion(
        &mut self,
        entity: EntityId,
        attribute: &str,
        value: &str,
        instance: TemporalInstance,
        source: FactSource,
        confidence: Confidence,
    ) -> AssertionId {
        self.next_assertion += 1;
        let id = AssertionId::from(self.next_assertion);
        tracing::trace!(
            assertion = %id,
            entity = %entity,
            attribute,
            value,
            instance = %instance,
            "assertion recorded"
        );
        self.events
            .push(LedgerEvent::AssertionRecorded(AttributeAssertion {
                id,
                entity,
                attribute: attribute.to_string(),
                value: value.to_string(),
                instance,
                source,
                confidence,
            }));
        id
    }

    pub fn record_anchor(
        &mut self,
        entity: EntityId,
        instance: TemporalInstance,
        source: FactSource,
        confidence: Confidence,
    ) -> AnchorId {
        self.next_anchor += 1;
        let id = AnchorId::from(self.next_anchor);
        self.events.push(LedgerEvent::AnchorRecorded(AnchorRecord {
            id,
            entity,
            instance,
            source,
            confidence,
        }));
        id
    }

    /// Facts recorded so far for `chapter` stop counting. Used before a
    /// changed chapter is analysed again.
    pub fn retire_chapter(&mut self, chapter: ChapterRef) {
        self.events.push(LedgerEvent::ChapterRetired { chapter });
    }

    pub fn redirect(&mut self, from: EntityId, to: EntityId) {
        if from != to {
            self.events.push(LedgerEvent::EntityRedirected { from, to });
        }
    }

    pub fn reassign_mention(&mut self, mention: MentionRef, entity: EntityId) {
        self.events
            .push(LedgerEvent::MentionReassigned { mention, entity });
    }

    /// Replay the log into the current view.
    pub fn snapshot(&self) -> LedgerSnapshot {
        replay(&self.events)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
