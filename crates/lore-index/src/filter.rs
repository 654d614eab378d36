//! Query filters. An empty filter matches every active conflict.

use serde::{Deserialize, Serialize};

use lore_core::models::{ChapterRef, ConflictStatus, ConflictType, EntityId, Tier};

use crate::record::ConflictRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    /// Empty means any tier.
    pub tiers: Vec<Tier>,
    /// Empty means any type.
    pub types: Vec<ConflictType>,
    /// Inclusive chapter range.
    pub chapter_range: Option<(ChapterRef, ChapterRef)>,
    pub status: Option<ConflictStatus>,
    pub critical_only: bool,
    pub entity: Option<EntityId>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_tiers(mut self, tiers: &[Tier]) -> Self {
        self.tiers = tiers.to_vec();
        self
    }

    pub fn with_types(mut self, types: &[ConflictType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn with_chapter_range(mut self, from: ChapterRef, to: ChapterRef) -> Self {
        self.chapter_range = Some((from, to));
        self
    }

    pub fn with_status(mut self, status: ConflictStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn critical_only(mut self) -> Self {
        self.critical_only = true;
        self
    }

    pub fn for_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn matches(&self, record: &ConflictRecord) -> bool {
        let conflict = &record.conflict;
        if !self.tiers.is_empty() && !self.tiers.contains(&conflict.tier) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&conflict.conflict_type) {
            return false;
        }
        if let Some((from, to)) = self.chapter_range {
            if conflict.chapter < from || conflict.chapter > to {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.critical_only && conflict.tier != Tier::Critical {
            return false;
        }
        if self.entity.is_some_and(|e| e != conflict.entity) {
            return false;
        }
        true
    }
}
