//! Project-scoped dynamic gazetteer.
//!
//! Readers take an immutable [`GazetteerSnapshot`] (cheap `Arc` clone) and
//! extraction runs against it. Writes go through `&mut Gazetteer`, so the
//! borrow checker enforces the single-writer discipline; every change bumps
//! the version.

use std::collections::BTreeMap;
use std::sync::Arc;

use lore_core::text::normalize_key;
use lore_core::MentionKind;
use serde::{Deserialize, Serialize};

/// How a term entered the gazetteer. Later variants outrank earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermOrigin {
    /// Capitalized token found by the candidate scan.
    Discovered,
    /// Name of a resolved entity backed by the tagger.
    Confirmed,
    /// Added by the operator. Survives re-analysis resets.
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerTerm {
    pub surface: String,
    pub kind: MentionKind,
    pub origin: TermOrigin,
}

/// Result of a single insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Added,
    /// Already present; origin raised.
    Upgraded,
    /// Already present with an equal or higher origin.
    Unchanged,
    /// Shorter than the minimum term length.
    TooShort,
    /// Capacity reached.
    Full,
}

/// Minimum normalized key length, in chars.
const MIN_TERM_CHARS: usize = 3;

/// Read-only view used by extraction workers.
#[derive(Debug, Clone)]
pub struct GazetteerSnapshot {
    terms: Arc<BTreeMap<String, GazetteerTerm>>,
    version: u64,
}

impl GazetteerSnapshot {
    /// An empty snapshot, for extraction without a project.
    pub fn empty() -> Self {
        Self {
            terms: Arc::new(BTreeMap::new()),
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Look up a normalized key.
    pub fn get(&self, key: &str) -> Option<&GazetteerTerm> {
        self.terms.get(key)
    }
}

#[derive(Debug, Clone)]
pub struct Gazetteer {
    terms: Arc<BTreeMap<String, GazetteerTerm>>,
    version: u64,
    capacity: usize,
}

impl Gazetteer {
    pub fn new(capacity: usize) -> Self {
        Self {
            terms: Arc::new(BTreeMap::new()),
            version: 0,
            capacity,
        }
    }

    pub fn snapshot(&self) -> GazetteerSnapshot {
        GazetteerSnapshot {
            terms: Arc::clone(&self.terms),
            version: self.version,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.terms.len() >= self.capacity
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.terms.contains_key(&normalize_key(surface))
    }

    /// Terms in key order.
    pub fn terms(&self) -> impl Iterator<Item = &GazetteerTerm> {
        self.terms.values()
    }

    pub fn insert(&mut self, surface: &str, kind: MentionKind, origin: TermOrigin) -> InsertOutcome {
        let key = normalize_key(surface);
        if key.chars().count() < MIN_TERM_CHARS {
            return InsertOutcome::TooShort;
        }
        if let Some(existing) = self.terms.get(&key) {
            if existing.origin >= origin {
                return InsertOutcome::Unchanged;
            }
            let terms = Arc::make_mut(&mut self.terms);
            if let Some(term) = terms.get_mut(&key) {
                term.origin = origin;
                term.kind = kind;
            }
            self.version += 1;
            return InsertOutcome::Upgraded;
        }
        if self.is_full() {
            return InsertOutcome::Full;
        }
        Arc::make_mut(&mut self.terms).insert(
            key,
            GazetteerTerm {
                surface: surface.trim().to_string(),
                kind,
                origin,
            },
        );
        self.version += 1;
        InsertOutcome::Added
    }

    /// Insert many terms in order. Returns how many were added or upgraded.
    pub fn commit<'a, I>(&mut self, terms: I, origin: TermOrigin) -> usize
    where
        I: IntoIterator<Item = (&'a str, MentionKind)>,
    {
        let mut changed = 0;
        let mut dropped = 0;
        for (surface, kind) in terms {
            match self.insert(surface, kind, origin) {
                InsertOutcome::Added | InsertOutcome::Upgraded => changed += 1,
                InsertOutcome::Full => dropped += 1,
                InsertOutcome::Unchanged | InsertOutcome::TooShort => {}
            }
        }
        if dropped > 0 {
            tracing::warn!(
                capacity = self.capacity,
                dropped,
                "gazetteer full, terms dropped"
            );
        }
        changed
    }

    pub fn remove(&mut self, surface: &str) -> bool {
        let key = normalize_key(surface);
        if !self.terms.contains_key(&key) {
            return false;
        }
        Arc::make_mut(&mut self.terms).remove(&key);
        self.version += 1;
        true
    }

    /// Start of a re-analysis: drop everything except operator terms.
    pub fn reset(&mut self) {
        let kept: BTreeMap<String, GazetteerTerm> = self
            .terms
            .iter()
            .filter(|(_, t)| t.origin == TermOrigin::Operator)
            .map(|(k, t)| (k.clone(), t.clone()))
            .collect();
        tracing::debug!(
            kept = kept.len(),
            dropped = self.terms.len() - kept.len(),
            "gazetteer reset"
        );
        self.terms = Arc::new(kept);
        self.version += 1;
    }
}
