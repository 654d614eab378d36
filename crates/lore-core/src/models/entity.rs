use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ids::EntityId;
use super::mention::{Mention, MentionKind, MentionRef};
use crate::text::normalize_key;

/// A canonical narrative subject that one or more mentions refer to.
///
/// Holds back-references only; mentions stay owned by their chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Most frequent surface form; ties go to the most complete one.
    pub display_name: String,
    pub kind: MentionKind,
    /// Every surface form seen for this entity.
    pub aliases: BTreeSet<String>,
    /// Mention back-references in narrative order.
    pub mentions: Vec<MentionRef>,
    /// Books this entity has been mentioned in.
    pub books: BTreeSet<u16>,
    /// Occurrence count per surface form.
    pub surface_counts: BTreeMap<String, u32>,
}

impl Entity {
    /// Start a new cluster from its first mention.
    pub fn new(id: EntityId, mention: &Mention) -> Self {
        let mut entity = Self {
            id,
            display_name: mention.text.clone(),
            kind: mention.kind,
            aliases: BTreeSet::new(),
            mentions: Vec::new(),
            books: BTreeSet::new(),
            surface_counts: BTreeMap::new(),
        };
        entity.add_mention(mention);
        entity
    }

    pub fn add_mention(&mut self, mention: &Mention) {
        self.aliases.insert(mention.text.clone());
        *self.surface_counts.entry(mention.text.clone()).or_insert(0) += 1;
        self.books.insert(mention.chapter.book);
        let reference = mention.reference();
        if let Err(pos) = self.mentions.binary_search(&reference) {
            self.mentions.insert(pos, reference);
        }
        self.refresh_display_name();
    }

    /// Union another cluster into this one. Order-independent: absorbing
    /// B into A yields the same aliases, mentions and display name as A into B.
    pub fn absorb(&mut self, other: Entity) {
        self.aliases.extend(other.aliases);
        self.books.extend(other.books);
        for (surface, count) in other.surface_counts {
            *self.surface_counts.entry(surface).or_insert(0) += count;
        }
        self.mentions.extend(other.mentions);
        self.mentions.sort();
        self.mentions.dedup();
        self.refresh_display_name();
    }

    /// Drop a mention back-reference and the surface count it contributed.
    /// The alias goes too once no remaining mention uses it.
    pub fn remove_mention(&mut self, reference: &MentionRef, surface: &str) {
        self.mentions.retain(|m| m != reference);
        if let Some(count) = self.surface_counts.get_mut(surface) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.surface_counts.remove(surface);
                self.aliases.remove(surface);
            }
        }
        self.refresh_display_name();
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Normalized alias keys, used for matching.
    pub fn alias_keys(&self) -> BTreeSet<String> {
        self.aliases.iter().map(|a| normalize_key(a)).collect()
    }

    pub fn has_alias_key(&self, key: &str) -> bool {
        self.aliases.iter().any(|a| normalize_key(a) == key)
    }

    fn refresh_display_name(&mut self) {
        let best = self.surface_counts.iter().max_by(|(a, ca), (b, cb)| {
            ca.cmp(cb)
                .then_with(|| token_count(a).cmp(&token_count(b)))
                .then_with(|| a.chars().count().cmp(&b.chars().count()))
                // Lexically smallest wins the final tie.
                .then_with(|| b.cmp(a))
        });
        if let Some((surface, _)) = best {
            self.display_name = surface.clone();
        } else if let Some(alias) = self.aliases.iter().next() {
            self.display_name = alias.clone();
        }
    }
}

fn token_count(s: &str) -> usize {
    s.split_whitespace().count()
}
