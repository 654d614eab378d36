//! EntityResolver: applies heuristic decisions to the roster and owns the
//! per-mention assignments and operator corrections.

use std::collections::{BTreeMap, BTreeSet};

use lore_core::config::ResolutionConfig;
use lore_core::errors::ResolutionError;
use lore_core::models::{
    ChapterRef, Entity, EntityId, Mention, MentionKind, MentionRef, MentionSource,
};
use lore_core::text::normalize_key;
use lore_core::Confidence;

use crate::assignment::{
    Assignment, AssignmentStatus, ChapterResolution, MatchRule, MergeSuggestion, SplitOutcome,
};
use crate::heuristics::{decide, Decision};
use crate::roster::Roster;

/// Single-threaded resolver. Chapters must be fed in narrative order.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    config: ResolutionConfig,
    roster: Roster,
    mentions: BTreeMap<MentionRef, Mention>,
    assignments: BTreeMap<MentionRef, Assignment>,
    suggestions: BTreeSet<MergeSuggestion>,
    last_chapter: Option<ChapterRef>,
}

impl EntityResolver {
    pub fn new(config: ResolutionConfig) -> Self {
        Self {
            config,
            roster: Roster::new(),
            mentions: BTreeMap::new(),
            assignments: BTreeMap::new(),
            suggestions: BTreeSet::new(),
            last_chapter: None,
        }
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.roster.get(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.roster.iter()
    }

    pub fn mention(&self, reference: &MentionRef) -> Option<&Mention> {
        self.mentions.get(reference)
    }

    pub fn assignment(&self, reference: &MentionRef) -> Option<&Assignment> {
        self.assignments.get(reference)
    }

    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values()
    }

    /// The entity a mention currently belongs to.
    pub fn entity_of(&self, reference: &MentionRef) -> Option<EntityId> {
        self.assignments.get(reference).and_then(|a| a.entity)
    }

    pub fn needs_review(&self) -> Vec<&Assignment> {
        self.assignments.values().filter(|a| a.needs_review()).collect()
    }

    pub fn merge_suggestions(&self) -> Vec<&MergeSuggestion> {
        self.suggestions.iter().collect()
    }

    /// Resolve one chapter's mentions, in order, against the roster.
    ///
    /// Re-resolving a chapter first forgets its previous mentions.
    pub fn resolve_chapter(&mut self, mentions: &[Mention]) -> ChapterResolution {
        let chapter = mentions.first().map(|m| m.chapter);
        let mut resolution = ChapterResolution {
            chapter,
            ..ChapterResolution::default()
        };
        let Some(chapter) = chapter else {
            return resolution;
        };
        if self.last_chapter.is_some_and(|last| chapter < last) {
            tracing::warn!(
                %chapter,
                last = ?self.last_chapter,
                "chapter resolved out of narrative order"
            );
        }
        self.forget_chapter(chapter);

        let mut confirmed_keys = BTreeSet::new();
        for mention in mentions {
            let decision = decide(mention, &self.roster, &self.config);
            let assignment = self.apply(mention, decision, &mut resolution);

            let accepted = assignment.entity.is_some() && !assignment.needs_review();
            if accepted
                && mention.source == MentionSource::Tagger
                && confirmed_keys.insert(normalize_key(&mention.text))
            {
                resolution
                    .confirmed_terms
                    .push((mention.text.clone(), mention.kind));
            }
            self.mentions.insert(mention.reference(), mention.clone());
            self.assignments
                .insert(assignment.mention, assignment.clone());
            resolution.assignments.push(assignment);
        }
        self.last_chapter = Some(self.last_chapter.map_or(chapter, |last| last.max(chapter)));

        tracing::debug!(
            %chapter,
            mentions = mentions.len(),
            created = resolution.created.len(),
            needs_review = resolution.review_count(),
            "chapter resolved"
        );
        resolution
    }

    fn apply(
        &mut self,
        mention: &Mention,
        decision: Decision,
        resolution: &mut ChapterResolution,
    ) -> Assignment {
        let reference = mention.reference();
        let mut assignment = Assignment {
            mention: reference,
            surface: mention.text.clone(),
            kind: mention.kind,
            source: mention.source,
            entity: None,
            rule: MatchRule::NewEntity,
            confidence: Confidence::default(),
            status: AssignmentStatus::Accepted,
            candidates: Vec::new(),
        };

        match decision {
            Decision::Attach {
                entity,
                rule,
                confidence,
            } => match self.roster.attach(entity, mention) {
                Ok(()) => {
                    assignment.entity = Some(entity);
                    assignment.rule = rule;
                    assignment.confidence = Confidence::new(confidence);
                }
                Err(e) => {
                    tracing::warn!(mention = %reference, error = %e, "attach failed, creating entity");
                    assignment.entity = Some(self.create(mention, resolution));
                }
            },
            Decision::Review {
                candidates,
                tentative,
                confidence,
            } => {
                tracing::info!(
                    mention = %reference,
                    surface = %mention.text,
                    candidates = candidates.len(),
                    "assignment needs review"
                );
                assignment.status = AssignmentStatus::NeedsReview;
                assignment.confidence = Confidence::new(confidence);
                assignment.candidates = candidates;
                assignment.rule = MatchRule::Unresolved;
                if let Some((entity, rule)) = tentative {
                    if self.roster.attach(entity, mention).is_ok() {
                        assignment.entity = Some(entity);
                        assignment.rule = rule;
                    }
                }
            }
            Decision::Create { suggestions } => {
                let id = self.create(mention, resolution);
                assignment.entity = Some(id);
                for candidate in suggestions {
                    let Some(existing) = self.roster.get(candidate) else {
                        continue;
                    };
                    let suggestion = MergeSuggestion {
                        entity: id,
                        candidate,
                        reason: format!(
                            "\"{}\" partially matches \"{}\" from another book",
                            mention.text, existing.display_name
                        ),
                    };
                    resolution.suggestions.push(suggestion.clone());
                    self.suggestions.insert(suggestion);
                }
            }
        }
        assignment
    }

    fn create(&mut self, mention: &Mention, resolution: &mut ChapterResolution) -> EntityId {
        let id = self.roster.create(mention);
        resolution.created.push(id);
        id
    }

    /// Drop every mention of `chapter` from the roster and assignments.
    pub fn forget_chapter(&mut self, chapter: ChapterRef) {
        let stale: Vec<MentionRef> = self
            .assignments
            .keys()
            .filter(|r| r.chapter == chapter)
            .copied()
            .collect();
        if stale.is_empty() {
            return;
        }
        for reference in stale {
            if let Some(assignment) = self.assignments.remove(&reference) {
                if let Some(entity) = assignment.entity {
                    self.roster.detach(entity, &reference, &assignment.surface);
                }
            }
            self.mentions.remove(&reference);
        }
        self.prune_suggestions();
    }

    /// Operator: pin `mention` to `entity`, moving it if needed.
    pub fn confirm_assignment(
        &mut self,
        mention: MentionRef,
        entity: EntityId,
    ) -> Result<(), ResolutionError> {
        if !self.roster.contains(entity) {
            return Err(ResolutionError::UnknownEntity { id: entity });
        }
        let current = self
            .assignments
            .get(&mention)
            .ok_or(ResolutionError::UnknownMention { mention })?
            .entity;
        if current != Some(entity) {
            let record = self
                .mentions
                .get(&mention)
                .ok_or(ResolutionError::UnknownMention { mention })?;
            if let Some(previous) = current {
                self.roster.detach(previous, &mention, &record.text);
            }
            self.roster.attach(entity, record)?;
        }
        if let Some(assignment) = self.assignments.get_mut(&mention) {
            if current != Some(entity) {
                assignment.rule = MatchRule::Operator;
            }
            assignment.entity = Some(entity);
            assignment.status = AssignmentStatus::Confirmed;
            assignment.confidence = Confidence::default();
            assignment.candidates.clear();
        }
        self.prune_suggestions();
        Ok(())
    }

    /// Operator: the mention is not who the resolver thought. It becomes its
    /// own entity, whose id is returned.
    pub fn deny_assignment(&mut self, mention: MentionRef) -> Result<EntityId, ResolutionError> {
        let current = self
            .assignments
            .get(&mention)
            .ok_or(ResolutionError::UnknownMention { mention })?
            .entity;
        let record = self
            .mentions
            .get(&mention)
            .ok_or(ResolutionError::UnknownMention { mention })?;

        let alone = current
            .and_then(|id| self.roster.get(id))
            .is_some_and(|e| e.mentions.len() == 1);
        let id = match current {
            Some(id) if alone => id,
            _ => {
                if let Some(previous) = current {
                    self.roster.detach(previous, &mention, &record.text);
                }
                self.roster.create(record)
            }
        };

        if let Some(assignment) = self.assignments.get_mut(&mention) {
            assignment.entity = Some(id);
            assignment.rule = MatchRule::Operator;
            assignment.status = AssignmentStatus::Confirmed;
            assignment.confidence = Confidence::default();
            assignment.candidates.clear();
        }
        tracing::info!(mention = %mention, entity = %id, "assignment denied");
        Ok(id)
    }

    /// Operator: fold `absorbed` into `keep`. Commutative in the resulting
    /// aliases and mentions; only the surviving id depends on argument order.
    pub fn merge_entities(
        &mut self,
        keep: EntityId,
        absorbed: EntityId,
    ) -> Result<(), ResolutionError> {
        if keep == absorbed {
            return if self.roster.contains(keep) {
                Ok(())
            } else {
                Err(ResolutionError::UnknownEntity { id: keep })
            };
        }
        self.roster.merge(keep, absorbed)?;
        for assignment in self.assignments.values_mut() {
            if assignment.entity == Some(absorbed) {
                assignment.entity = Some(keep);
            }
        }
        self.suggestions = std::mem::take(&mut self.suggestions)
            .into_iter()
            .filter_map(|mut s| {
                if s.entity == absorbed {
                    s.entity = keep;
                }
                if s.candidate == absorbed {
                    s.candidate = keep;
                }
                (s.entity != s.candidate).then_some(s)
            })
            .collect();
        tracing::info!(keep = %keep, absorbed = %absorbed, "entities merged");
        Ok(())
    }

    /// Operator: move every mention whose surface is one of `aliases` out of
    /// `entity` into a new entity.
    pub fn split_entity(
        &mut self,
        entity: EntityId,
        aliases: &[String],
    ) -> Result<SplitOutcome, ResolutionError> {
        let source = self
            .roster
            .get(entity)
            .ok_or(ResolutionError::UnknownEntity { id: entity })?;
        let keys: BTreeSet<String> = aliases.iter().map(|a| normalize_key(a)).collect();
        if keys.is_empty() {
            return Err(ResolutionError::InvalidSplit {
                entity,
                reason: "no aliases given".to_string(),
            });
        }

        let moved: Vec<MentionRef> = source
            .mentions
            .iter()
            .filter(|r| {
                self.mentions
                    .get(r)
                    .is_some_and(|m| keys.contains(&normalize_key(&m.text)))
            })
            .copied()
            .collect();
        if moved.is_empty() {
            return Err(ResolutionError::InvalidSplit {
                entity,
                reason: "no mention uses the given aliases".to_string(),
            });
        }
        if moved.len() == source.mentions.len() {
            return Err(ResolutionError::InvalidSplit {
                entity,
                reason: "split would leave the entity without mentions".to_string(),
            });
        }

        let mut new_entity = None;
        for reference in &moved {
            let Some(record) = self.mentions.get(reference) else {
                continue;
            };
            self.roster.detach(entity, reference, &record.text);
            match new_entity {
                None => new_entity = Some(self.roster.create(record)),
                Some(id) => self.roster.attach(id, record)?,
            }
        }
        let new_entity = new_entity.ok_or(ResolutionError::InvalidSplit {
            entity,
            reason: "no mention uses the given aliases".to_string(),
        })?;

        for reference in &moved {
            if let Some(assignment) = self.assignments.get_mut(reference) {
                assignment.entity = Some(new_entity);
                assignment.rule = MatchRule::Operator;
                assignment.status = AssignmentStatus::Confirmed;
                assignment.confidence = Confidence::default();
                assignment.candidates.clear();
            }
        }
        tracing::info!(
            entity = %entity,
            new_entity = %new_entity,
            moved = moved.len(),
            "entity split"
        );
        Ok(SplitOutcome {
            from: entity,
            new_entity,
            moved,
        })
    }

    /// Operator: reject a merge suggestion. Returns whether it existed.
    pub fn dismiss_suggestion(&mut self, entity: EntityId, candidate: EntityId) -> bool {
        let before = self.suggestions.len();
        self.suggestions
            .retain(|s| !(s.entity == entity && s.candidate == candidate));
        before != self.suggestions.len()
    }

    /// Names of tagger-backed accepted entities, for gazetteer feedback.
    pub fn confirmed_terms(&self) -> Vec<(String, MentionKind)> {
        let mut seen = BTreeSet::new();
        self.assignments
            .values()
            .filter(|a| a.source == MentionSource::Tagger && a.entity.is_some() && !a.needs_review())
            .filter(|a| seen.insert(normalize_key(&a.surface)))
            .map(|a| (a.surface.clone(), a.kind))
            .collect()
    }

    pub fn reset(&mut self) {
        self.roster.clear();
        self.mentions.clear();
        self.assignments.clear();
        self.suggestions.clear();
        self.last_chapter = None;
    }

    fn prune_suggestions(&mut self) {
        let roster = &self.roster;
        self.suggestions
            .retain(|s| roster.contains(s.entity) && roster.contains(s.candidate));
    }
}
