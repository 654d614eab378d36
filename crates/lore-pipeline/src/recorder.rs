//! Chapter annotations into ledger facts.
//!
//! An annotation is attributed to the first mention its span overlaps. The
//! fact is recorded for that mention's entity with the mention as
//! provenance; its confidence defaults to the mention's confidence.
//! Anchors failing validation are dropped and reported, never fatal.

use lore_core::config::UnanchoredPolicy;
use lore_core::constants::CHAPTER_REFERENCE_PREFIX;
use lore_core::errors::LoreErrorCode;
use lore_core::models::{
    Annotation, AnnotationPayload, Chapter, EntityId, FactSource, Mention, TemporalAnchor,
    TemporalInstance,
};
use lore_core::text::normalize_key;
use lore_core::Confidence;
use lore_ledger::AttributeLedger;
use lore_resolution::EntityResolver;
use lore_temporal::AnchorParser;

use crate::report::DroppedAnchor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub assertions: usize,
    pub anchors: usize,
    pub unattached: usize,
    pub dropped: Vec<DroppedAnchor>,
}

pub struct ChapterRecorder<'a> {
    pub resolver: &'a EntityResolver,
    pub parser: &'a AnchorParser,
    pub policy: UnanchoredPolicy,
}

impl ChapterRecorder<'_> {
    pub fn record(
        &self,
        chapter: &Chapter,
        mentions: &[Mention],
        ledger: &mut AttributeLedger,
    ) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();
        for annotation in &chapter.annotations {
            let attributed = mentions
                .iter()
                .filter(|m| m.span.overlaps(&annotation.span))
                .find_map(|m| self.resolver.entity_of(&m.reference()).map(|e| (m, e)));
            let Some((mention, entity)) = attributed else {
                tracing::debug!(
                    chapter = %chapter.reference,
                    span = %annotation.span,
                    "annotation lands on no resolved mention"
                );
                outcome.unattached += 1;
                continue;
            };

            let Some(instance) = self.instance(chapter, annotation, entity, &mut outcome) else {
                continue;
            };
            let source = FactSource {
                mention: mention.reference(),
                chapter: chapter.reference,
                span: annotation.span,
                origin: mention.source,
                flashback: chapter.flashback,
            };
            let confidence = annotation
                .confidence
                .map(Confidence::new)
                .unwrap_or(mention.confidence);

            match &annotation.payload {
                AnnotationPayload::Attribute { name, value } => {
                    let attribute = normalize_key(name).replace(' ', "_");
                    ledger.record_assertion(
                        entity,
                        &attribute,
                        value.trim(),
                        instance,
                        source,
                        confidence,
                    );
                    outcome.assertions += 1;
                }
                AnnotationPayload::Anchor => {
                    ledger.record_anchor(entity, instance, source, confidence);
                    outcome.anchors += 1;
                }
            }
        }
        outcome
    }

    fn instance(
        &self,
        chapter: &Chapter,
        annotation: &Annotation,
        entity: EntityId,
        outcome: &mut RecordOutcome,
    ) -> Option<TemporalInstance> {
        match (&annotation.anchor, &annotation.payload) {
            (Some(token), _) => match self.parser.parse_for(entity, token) {
                Ok(instance) => Some(instance),
                Err(e) => {
                    tracing::warn!(
                        chapter = %chapter.reference,
                        token = %token,
                        error = %e,
                        "anchor dropped"
                    );
                    outcome.dropped.push(DroppedAnchor {
                        chapter: chapter.reference,
                        token: token.clone(),
                        code: e.error_code().to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            },
            (None, AnnotationPayload::Anchor) => {
                tracing::debug!(chapter = %chapter.reference, "anchor annotation without a token");
                None
            }
            (None, AnnotationPayload::Attribute { .. }) => match self.policy {
                UnanchoredPolicy::ChapterLocal => Some(TemporalInstance::new(
                    entity,
                    TemporalAnchor::Offset {
                        years: 0,
                        reference: Some(format!("{CHAPTER_REFERENCE_PREFIX}{}", chapter.reference)),
                    },
                )),
                UnanchoredPolicy::Skip => None,
            },
        }
    }
}
