//! Matching rules, as a pure function of one mention and the current roster.
//!
//! Order of precedence:
//! 1. Exact alias. Across books the hit must be a full name. Several exact
//!    hits go to review.
//! 2. Unique token-subset/superset match among same-book entities. An
//!    entity whose multi-token aliases disagree with the mention is not a
//!    match ("Juan Pérez" never joins "Juan García" through "Juan").
//! 3. Partial matches only in other books: new entity plus merge suggestions.
//! 4. Otherwise a new entity.
//!
//! Every same-book entity that shares a name token without matching lowers
//! the confidence by `near_name_penalty`.

use std::collections::BTreeSet;

use lore_core::config::ResolutionConfig;
use lore_core::models::{Entity, EntityId, Mention, MentionSource};
use lore_core::text::{key_tokens, normalize_key};

use crate::assignment::MatchRule;
use crate::roster::Roster;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Attach {
        entity: EntityId,
        rule: MatchRule,
        confidence: f64,
    },
    /// Below threshold or ambiguous. `tentative` is set when a single
    /// candidate exists; the mention attaches to it pending review.
    Review {
        candidates: Vec<EntityId>,
        tentative: Option<(EntityId, MatchRule)>,
        confidence: f64,
    },
    /// Start a new entity. `suggestions` lists partial matches in other books.
    Create { suggestions: Vec<EntityId> },
}

fn tokens_of(surface: &str) -> BTreeSet<String> {
    key_tokens(&normalize_key(surface))
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Kind multiplier, or `None` when the kinds are incompatible.
fn kind_factor(mention: &Mention, entity: &Entity, config: &ResolutionConfig) -> Option<f64> {
    if mention.kind == entity.kind {
        Some(1.0)
    } else if mention.source == MentionSource::Gazetteer {
        // Gazetteer kinds are a guess.
        Some(config.cross_kind_penalty)
    } else {
        None
    }
}

fn partial_relation(mention: &BTreeSet<String>, entity: &Entity) -> Option<MatchRule> {
    let mut rule = None;
    for alias in &entity.aliases {
        let alias = tokens_of(alias);
        let compatible = alias.is_subset(mention) || mention.is_subset(&alias);
        if alias.len() >= 2 && !compatible {
            return None;
        }
        if mention.len() < alias.len() && mention.is_subset(&alias) {
            rule = Some(MatchRule::TokenSubset);
        } else if alias.len() < mention.len() && alias.is_subset(mention) && rule.is_none() {
            rule = Some(MatchRule::TokenSuperset);
        }
    }
    rule
}

fn shares_token(mention: &BTreeSet<String>, entity: &Entity) -> bool {
    entity
        .aliases
        .iter()
        .any(|alias| !tokens_of(alias).is_disjoint(mention))
}

/// Decide where `mention` belongs. Never mutates the roster.
pub fn decide(mention: &Mention, roster: &Roster, config: &ResolutionConfig) -> Decision {
    let key = normalize_key(&mention.text);
    let tokens = tokens_of(&mention.text);
    if tokens.is_empty() {
        return Decision::Create {
            suggestions: Vec::new(),
        };
    }
    let book = mention.chapter.book;

    let mut exact: Vec<(EntityId, f64)> = Vec::new();
    let mut other_books: Vec<EntityId> = Vec::new();
    for entity in roster.iter().filter(|e| e.has_alias_key(&key)) {
        let Some(factor) = kind_factor(mention, entity, config) else {
            continue;
        };
        if entity.books.contains(&book) || is_full_name_match(&tokens, entity) {
            exact.push((entity.id, factor));
        } else {
            other_books.push(entity.id);
        }
    }

    match exact.as_slice() {
        [] => {}
        [(id, factor)] => {
            let candidates = near_ids(roster, *id, &tokens, book);
            let confidence =
                config.exact_alias_confidence * factor - penalty(candidates.len() - 1, config);
            return settle(*id, MatchRule::ExactAlias, confidence, candidates, config);
        }
        many => {
            return Decision::Review {
                candidates: many.iter().map(|(id, _)| *id).collect(),
                tentative: None,
                confidence: 0.0,
            };
        }
    }

    let mut in_scope: Vec<(EntityId, MatchRule, f64)> = Vec::new();
    let mut near: Vec<EntityId> = Vec::new();
    for entity in roster.iter() {
        let Some(factor) = kind_factor(mention, entity, config) else {
            continue;
        };
        let same_book = entity.books.contains(&book);
        match partial_relation(&tokens, entity) {
            Some(rule) if same_book => in_scope.push((entity.id, rule, factor)),
            Some(_) if !other_books.contains(&entity.id) => other_books.push(entity.id),
            Some(_) => {}
            None if same_book && shares_token(&tokens, entity) => near.push(entity.id),
            None => {}
        }
    }

    match in_scope.as_slice() {
        [(id, rule, factor)] => {
            let base = match rule {
                MatchRule::TokenSubset => config.subset_confidence,
                _ => config.superset_confidence,
            };
            let confidence = base * factor - penalty(near.len(), config);
            let mut candidates = vec![*id];
            candidates.extend(near);
            settle(*id, *rule, confidence, candidates, config)
        }
        [] => Decision::Create {
            suggestions: other_books,
        },
        many => Decision::Review {
            candidates: many.iter().map(|(id, _, _)| *id).collect(),
            tentative: None,
            confidence: 0.0,
        },
    }
}

/// Across books an exact alias only counts when it is a full name, or when
/// the entity has never been known by a longer one.
fn is_full_name_match(mention: &BTreeSet<String>, entity: &Entity) -> bool {
    mention.len() >= 2 || entity.aliases.iter().all(|a| tokens_of(a).len() < 2)
}

fn penalty(near: usize, config: &ResolutionConfig) -> f64 {
    config.near_name_penalty * near as f64
}

/// The matched entity followed by same-book entities sharing a name token.
fn near_ids(
    roster: &Roster,
    matched: EntityId,
    tokens: &BTreeSet<String>,
    book: u16,
) -> Vec<EntityId> {
    let mut ids = vec![matched];
    ids.extend(
        roster
            .iter()
            .filter(|e| e.id != matched && e.books.contains(&book) && shares_token(tokens, e))
            .map(|e| e.id),
    );
    ids
}

fn settle(
    entity: EntityId,
    rule: MatchRule,
    confidence: f64,
    candidates: Vec<EntityId>,
    config: &ResolutionConfig,
) -> Decision {
    let confidence = confidence.clamp(0.0, 1.0);
    if confidence >= config.review_threshold {
        Decision::Attach {
            entity,
            rule,
            confidence,
        }
    } else {
        Decision::Review {
            candidates,
            tentative: Some((entity, rule)),
            confidence,
        }
    }
}
