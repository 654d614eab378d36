//! The project's entity roster.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lore_core::errors::ResolutionError;
use lore_core::models::{Entity, EntityId, Mention, MentionRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Start a new entity from its first mention.
    pub fn create(&mut self, mention: &Mention) -> EntityId {
        let id = EntityId::from(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, mention));
        id
    }

    pub fn attach(&mut self, id: EntityId, mention: &Mention) -> Result<(), ResolutionError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(ResolutionError::UnknownEntity { id })?;
        entity.add_mention(mention);
        Ok(())
    }

    /// Remove one mention from its entity. An entity left without mentions
    /// is dropped from the roster.
    pub fn detach(&mut self, id: EntityId, reference: &MentionRef, surface: &str) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.remove_mention(reference, surface);
            if entity.is_empty() {
                self.entities.remove(&id);
            }
        }
    }

    /// Fold `absorbed` into `keep`.
    pub fn merge(&mut self, keep: EntityId, absorbed: EntityId) -> Result<(), ResolutionError> {
        if !self.entities.contains_key(&keep) {
            return Err(ResolutionError::UnknownEntity { id: keep });
        }
        let other = self
            .entities
            .remove(&absorbed)
            .ok_or(ResolutionError::UnknownEntity { id: absorbed })?;
        if let Some(entity) = self.entities.get_mut(&keep) {
            entity.absorb(other);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
