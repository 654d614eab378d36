use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lore_core::config::IndexConfig;
use lore_core::errors::IndexError;
use lore_core::models::{ChapterRef, Conflict, ConflictId, ConflictStatus};

use crate::export;
use crate::filter::EventFilter;
use crate::record::ConflictRecord;
use crate::stats::{self, IndexStats};

/// What one [`EventIndex::ingest`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub added: usize,
    pub refreshed: usize,
    /// Previously active conflicts absent from this detection run.
    pub retired: usize,
}

/// Conflict records keyed by content id, plus the chapters the project has
/// analysed (needed for the empty-chapter signal).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventIndex {
    config: IndexConfig,
    chapters: BTreeSet<ChapterRef>,
    records: BTreeMap<ConflictId, ConflictRecord>,
}

impl EventIndex {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            chapters: BTreeSet::new(),
            records: BTreeMap::new(),
        }
    }

    pub fn register_chapters(&mut self, chapters: impl IntoIterator<Item = ChapterRef>) {
        self.chapters.extend(chapters);
    }

    pub fn chapters(&self) -> &BTreeSet<ChapterRef> {
        &self.chapters
    }

    /// Replace the active conflict set with a fresh detection result.
    /// Statuses and history of known ids are kept.
    pub fn ingest(&mut self, conflicts: Vec<Conflict>) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        let fresh: BTreeSet<ConflictId> = conflicts.iter().map(|c| c.id.clone()).collect();
        for record in self.records.values_mut() {
            if record.active && !fresh.contains(&record.conflict.id) {
                record.active = false;
                outcome.retired += 1;
            }
        }
        for conflict in conflicts {
            match self.records.get_mut(&conflict.id) {
                Some(record) => {
                    record.conflict = conflict;
                    record.active = true;
                    outcome.refreshed += 1;
                }
                None => {
                    self.records
                        .insert(conflict.id.clone(), ConflictRecord::new(conflict));
                    outcome.added += 1;
                }
            }
        }
        tracing::debug!(
            added = outcome.added,
            refreshed = outcome.refreshed,
            retired = outcome.retired,
            "conflicts ingested"
        );
        outcome
    }

    pub fn get(&self, id: &ConflictId) -> Option<&ConflictRecord> {
        self.records.get(id).filter(|r| r.active)
    }

    /// Active records in id order.
    pub fn records(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.records.values().filter(|r| r.active)
    }

    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matching records in narrative order, most severe first per chapter.
    pub fn query(&self, filter: &EventFilter) -> Vec<&ConflictRecord> {
        let mut hits: Vec<&ConflictRecord> =
            self.records().filter(|r| filter.matches(r)).collect();
        hits.sort_by(|a, b| {
            (a.conflict.chapter, a.conflict.tier, &a.conflict.id)
                .cmp(&(b.conflict.chapter, b.conflict.tier, &b.conflict.id))
        });
        hits
    }

    pub fn stats(&self) -> IndexStats {
        stats::compute(self.records(), &self.chapters, &self.config)
    }

    pub fn mark_resolved(&mut self, id: &ConflictId, note: Option<&str>) -> Result<(), IndexError> {
        self.transition(id, ConflictStatus::Resolved, note)
    }

    pub fn dismiss(&mut self, id: &ConflictId, note: Option<&str>) -> Result<(), IndexError> {
        self.transition(id, ConflictStatus::Dismissed, note)
    }

    pub fn reopen(&mut self, id: &ConflictId, note: Option<&str>) -> Result<(), IndexError> {
        self.transition(id, ConflictStatus::Unresolved, note)
    }

    fn transition(
        &mut self,
        id: &ConflictId,
        to: ConflictStatus,
        note: Option<&str>,
    ) -> Result<(), IndexError> {
        let record = self
            .records
            .get_mut(id)
            .filter(|r| r.active)
            .ok_or_else(|| IndexError::UnknownConflict { id: id.clone() })?;
        let allowed = match to {
            ConflictStatus::Unresolved => record.status != ConflictStatus::Unresolved,
            _ => record.status == ConflictStatus::Unresolved,
        };
        if !allowed {
            return Err(IndexError::InvalidTransition {
                id: id.clone(),
                status: record.status,
            });
        }
        tracing::info!(conflict = %id, from = %record.status, to = %to, "conflict status changed");
        record.transition(to, note);
        Ok(())
    }

    pub fn export_csv(&self, filter: &EventFilter) -> Result<String, IndexError> {
        export::to_csv(&self.query(filter))
    }

    pub fn export_json(&self, filter: &EventFilter) -> Result<String, IndexError> {
        export::to_json(&self.query(filter), filter)
    }

    /// Forget the analysed chapters. Conflict statuses stay.
    pub fn clear_chapters(&mut self) {
        self.chapters.clear();
    }
}
