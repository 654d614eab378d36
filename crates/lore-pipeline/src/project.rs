//! A manuscript project: the owner of all per-project state.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;
use uuid::Uuid;

use lore_consistency::ConsistencyDetector;
use lore_core::config::LoreConfig;
use lore_core::errors::{ExtractionError, PipelineError};
use lore_core::models::{
    AttributeAssertion, Chapter, ChapterRef, ConflictId, Entity, EntityId, MentionKind,
    MentionRef,
};
use lore_core::text::normalize_key;
use lore_core::traits::{CancellationToken, Checkpoint, ITagger};
use lore_extraction::{ChapterExtraction, Gazetteer, InsertOutcome, MentionExtractor, TermOrigin};
use lore_index::{ConflictRecord, EventFilter, EventIndex, IndexStats};
use lore_ledger::AttributeLedger;
use lore_resolution::{Assignment, EntityResolver, MergeSuggestion, SplitOutcome};
use lore_temporal::AnchorParser;

use crate::fingerprint::fingerprint;
use crate::recorder::ChapterRecorder;
use crate::records::ProjectRecords;
use crate::report::{AnalysisReport, ChapterState, UnanalyzedChapter};

/// Per-project engine state. Not shared between projects.
///
/// Mutation goes through `&mut self`: one analysis or operator action at a
/// time. Within a run, extraction fans out over a rayon pool while every
/// write to shared state happens on the calling thread.
pub struct Project {
    name: String,
    config: LoreConfig,
    extractor: MentionExtractor,
    gazetteer: Gazetteer,
    resolver: EntityResolver,
    parser: AnchorParser,
    ledger: AttributeLedger,
    detector: ConsistencyDetector,
    index: EventIndex,
    reference_events: BTreeMap<String, i32>,
    chapters: BTreeMap<ChapterRef, ChapterState>,
}

impl Project {
    pub fn new(name: impl Into<String>, config: LoreConfig, tagger: Arc<dyn ITagger>) -> Self {
        Self {
            name: name.into(),
            extractor: MentionExtractor::new(tagger, config.extraction.clone()),
            gazetteer: Gazetteer::new(config.extraction.max_gazetteer_terms),
            resolver: EntityResolver::new(config.resolution.clone()),
            parser: AnchorParser::new(&config.temporal),
            ledger: AttributeLedger::new(),
            detector: ConsistencyDetector::from_config(&config),
            index: EventIndex::new(config.index.clone()),
            reference_events: BTreeMap::new(),
            chapters: BTreeMap::new(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LoreConfig {
        &self.config
    }

    /// Analyse `chapters`, skipping those unchanged since their last analysis.
    ///
    /// Only a fatal tagger failure returns `Err`; chapters committed before
    /// it are kept and the next run resumes from the failed chapter.
    pub fn analyze(
        &mut self,
        chapters: &[Chapter],
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("analyze", run_id = %run_id, project = %self.name);
        let _guard = span.enter();
        let mut report = AnalysisReport::new(run_id, &self.name);

        let mut ordered: Vec<&Chapter> = chapters.iter().collect();
        ordered.sort_by_key(|c| c.reference);
        ordered.dedup_by(|later, earlier| {
            let duplicate = later.reference == earlier.reference;
            if duplicate {
                tracing::warn!(chapter = %later.reference, "duplicate chapter ignored");
            }
            duplicate
        });

        let mut pending: Vec<(&Chapter, String)> = Vec::with_capacity(ordered.len());
        for chapter in ordered {
            let fingerprint = fingerprint(chapter);
            if self
                .chapters
                .get(&chapter.reference)
                .is_some_and(|s| s.is_analyzed_as(&fingerprint))
            {
                report.skipped.push(chapter.reference);
            } else {
                pending.push((chapter, fingerprint));
            }
        }
        tracing::info!(
            pending = pending.len(),
            skipped = report.skipped.len(),
            "analysis started"
        );

        let wave_size = self.config.pipeline.parallelism.max(1);
        let pending_refs: Vec<ChapterRef> = pending.iter().map(|(c, _)| c.reference).collect();
        let mut fatal = None;
        for (i, wave) in pending.chunks(wave_size).enumerate() {
            if let Checkpoint::Stop { resume_from, .. } =
                cancel.checkpoint(&pending_refs[i * wave_size..])
            {
                report.cancelled = true;
                report.resume_from = Some(resume_from);
                break;
            }
            let outcomes = self.extract_wave(wave);
            if let Err(e) = self.commit_wave(wave, outcomes, &mut report) {
                fatal = Some(e);
                break;
            }
        }

        self.index
            .register_chapters(self.chapters.keys().copied());
        self.refresh_conflicts();

        report.entities = self.resolver.roster().len();
        report.needs_review = self.resolver.needs_review().len();
        report.conflicts = self.index.len();
        report.gazetteer_version = self.gazetteer.version();

        if let Some(e) = fatal {
            tracing::error!(error = %e, "analysis aborted");
            return Err(e);
        }
        tracing::info!(
            analyzed = report.analyzed.len(),
            unanalyzed = report.unanalyzed.len(),
            entities = report.entities,
            conflicts = report.conflicts,
            cancelled = report.cancelled,
            "analysis finished"
        );
        Ok(report)
    }

    /// Start over: fresh roster, ledger and gazetteer (operator terms kept),
    /// then analyse every chapter. Conflict statuses are kept.
    pub fn reanalyze(
        &mut self,
        chapters: &[Chapter],
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, PipelineError> {
        self.gazetteer.reset();
        self.resolver.reset();
        self.ledger = AttributeLedger::new();
        self.chapters.clear();
        self.index.clear_chapters();
        self.analyze(chapters, cancel)
    }

    /// Extract one wave in parallel against a single gazetteer snapshot.
    fn extract_wave(
        &self,
        wave: &[(&Chapter, String)],
    ) -> DashMap<ChapterRef, Result<ChapterExtraction, ExtractionError>> {
        let snapshot = self.gazetteer.snapshot();
        let outcomes = DashMap::with_capacity(wave.len());
        wave.par_iter().for_each(|(chapter, _)| {
            let span = tracing::debug_span!("chapter", chapter = %chapter.reference);
            let _guard = span.enter();
            let outcome = self
                .extractor
                .extract(chapter.reference, &chapter.text, &snapshot);
            outcomes.insert(chapter.reference, outcome);
        });
        outcomes
    }

    /// Apply a wave's extractions in narrative order. Stops at the first
    /// fatal tagger failure; later chapters of the wave stay pending.
    fn commit_wave(
        &mut self,
        wave: &[(&Chapter, String)],
        outcomes: DashMap<ChapterRef, Result<ChapterExtraction, ExtractionError>>,
        report: &mut AnalysisReport,
    ) -> Result<(), PipelineError> {
        for (chapter, fingerprint) in wave {
            let reference = chapter.reference;
            let Some((_, outcome)) = outcomes.remove(&reference) else {
                continue;
            };
            let span = tracing::debug_span!("chapter", chapter = %reference);
            let _guard = span.enter();

            let extraction = match outcome {
                Ok(extraction) => extraction,
                Err(ExtractionError::TaggerUnavailable { chapter, source }) if source.is_fatal() => {
                    return Err(PipelineError::TaggerUnavailable { chapter, source });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "chapter left unanalyzed");
                    self.forget_chapter(reference);
                    self.chapters.insert(
                        reference,
                        ChapterState::Unanalyzed {
                            fingerprint: fingerprint.clone(),
                            reason: e.to_string(),
                        },
                    );
                    report.unanalyzed.push(UnanalyzedChapter {
                        chapter: reference,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            self.gazetteer.commit(
                extraction
                    .discovered
                    .iter()
                    .map(|t| (t.surface.as_str(), t.kind)),
                TermOrigin::Discovered,
            );

            self.forget_chapter(reference);
            let resolution = self.resolver.resolve_chapter(&extraction.mentions);

            let recorded = ChapterRecorder {
                resolver: &self.resolver,
                parser: &self.parser,
                policy: self.config.consistency.unanchored_policy,
            }
            .record(chapter, &extraction.mentions, &mut self.ledger);

            self.gazetteer.commit(
                resolution
                    .confirmed_terms
                    .iter()
                    .map(|(surface, kind)| (surface.as_str(), *kind)),
                TermOrigin::Confirmed,
            );

            tracing::debug!(
                mentions = extraction.mentions.len(),
                assertions = recorded.assertions,
                anchors = recorded.anchors,
                dropped = recorded.dropped.len(),
                "chapter committed"
            );
            report.mentions += extraction.mentions.len();
            report.unattached_annotations += recorded.unattached;
            report.dropped_anchors.extend(recorded.dropped);
            report.analyzed.push(reference);
            self.chapters.insert(
                reference,
                ChapterState::Analyzed {
                    fingerprint: fingerprint.clone(),
                },
            );
        }
        Ok(())
    }

    /// Drop what an earlier analysis of `chapter` produced.
    fn forget_chapter(&mut self, chapter: ChapterRef) {
        if self.chapters.contains_key(&chapter) {
            self.ledger.retire_chapter(chapter);
            self.resolver.forget_chapter(chapter);
        }
    }

    /// Re-run detection over the current ledger and refresh the index.
    fn refresh_conflicts(&mut self) {
        let names: BTreeMap<EntityId, String> = self
            .resolver
            .entities()
            .map(|e| (e.id, e.display_name.clone()))
            .collect();
        let conflicts =
            self.detector
                .detect(&self.ledger.snapshot(), &names, &self.reference_events);
        self.index.ingest(conflicts);
    }

    // ---- Operator actions ----

    pub fn mark_resolved(&mut self, id: &ConflictId, note: Option<&str>) -> Result<(), PipelineError> {
        Ok(self.index.mark_resolved(id, note)?)
    }

    pub fn dismiss_conflict(
        &mut self,
        id: &ConflictId,
        note: Option<&str>,
    ) -> Result<(), PipelineError> {
        Ok(self.index.dismiss(id, note)?)
    }

    pub fn reopen_conflict(&mut self, id: &ConflictId, note: Option<&str>) -> Result<(), PipelineError> {
        Ok(self.index.reopen(id, note)?)
    }

    /// Pin a mention to an entity; its facts follow.
    pub fn confirm_assignment(
        &mut self,
        mention: MentionRef,
        entity: EntityId,
    ) -> Result<(), PipelineError> {
        self.resolver.confirm_assignment(mention, entity)?;
        self.ledger.reassign_mention(mention, entity);
        self.refresh_conflicts();
        Ok(())
    }

    /// Detach a mention into its own entity, whose id is returned.
    pub fn deny_assignment(&mut self, mention: MentionRef) -> Result<EntityId, PipelineError> {
        let entity = self.resolver.deny_assignment(mention)?;
        self.ledger.reassign_mention(mention, entity);
        self.refresh_conflicts();
        Ok(entity)
    }

    pub fn merge_entities(&mut self, keep: EntityId, absorbed: EntityId) -> Result<(), PipelineError> {
        self.resolver.merge_entities(keep, absorbed)?;
        self.ledger.redirect(absorbed, keep);
        self.refresh_conflicts();
        Ok(())
    }

    pub fn split_entity(
        &mut self,
        entity: EntityId,
        aliases: &[String],
    ) -> Result<SplitOutcome, PipelineError> {
        let outcome = self.resolver.split_entity(entity, aliases)?;
        for mention in &outcome.moved {
            self.ledger.reassign_mention(*mention, outcome.new_entity);
        }
        self.refresh_conflicts();
        Ok(outcome)
    }

    pub fn dismiss_suggestion(&mut self, entity: EntityId, candidate: EntityId) -> bool {
        self.resolver.dismiss_suggestion(entity, candidate)
    }

    /// Operator term. Used from the next analysed chapter on and kept
    /// across [`Project::reanalyze`].
    pub fn add_gazetteer_term(&mut self, surface: &str, kind: MentionKind) -> Result<(), PipelineError> {
        let reason = match self.gazetteer.insert(surface, kind, TermOrigin::Operator) {
            InsertOutcome::Added | InsertOutcome::Upgraded | InsertOutcome::Unchanged => {
                return Ok(());
            }
            InsertOutcome::TooShort => "term is too short",
            InsertOutcome::Full => "gazetteer is full",
        };
        Err(ExtractionError::InvalidTerm {
            term: surface.to_string(),
            reason: reason.to_string(),
        }
        .into())
    }

    pub fn remove_gazetteer_term(&mut self, surface: &str) -> bool {
        self.gazetteer.remove(surface)
    }

    /// Place a named event on the calendar. Offsets relative to it then
    /// join the age/year order.
    pub fn declare_reference_event(&mut self, label: &str, year: i32) {
        self.reference_events.insert(label.trim().to_string(), year);
        self.refresh_conflicts();
    }

    // ---- Read side ----

    pub fn entities(&self) -> Vec<&Entity> {
        self.resolver.entities().collect()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.resolver.entity(id)
    }

    /// Entity whose aliases include `surface` (accent and case insensitive).
    pub fn entity_named(&self, surface: &str) -> Option<&Entity> {
        let key = normalize_key(surface);
        self.resolver.entities().find(|e| e.has_alias_key(&key))
    }

    pub fn assignment(&self, mention: &MentionRef) -> Option<&Assignment> {
        self.resolver.assignment(mention)
    }

    pub fn needs_review(&self) -> Vec<&Assignment> {
        self.resolver.needs_review()
    }

    pub fn merge_suggestions(&self) -> Vec<&MergeSuggestion> {
        self.resolver.merge_suggestions()
    }

    pub fn chapter_state(&self, chapter: ChapterRef) -> Option<&ChapterState> {
        self.chapters.get(&chapter)
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn ledger(&self) -> &AttributeLedger {
        &self.ledger
    }

    /// Every assertion of `attribute` for `entity`, in story-time order
    /// where the instants compare.
    pub fn attribute_history(&self, entity: EntityId, attribute: &str) -> Vec<AttributeAssertion> {
        let facts = self.ledger.snapshot().facts_for(entity);
        self.detector
            .attribute_history(&facts, attribute, &self.reference_events)
    }

    pub fn query(&self, filter: &EventFilter) -> Vec<&ConflictRecord> {
        self.index.query(filter)
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn export_csv(&self, filter: &EventFilter) -> Result<String, PipelineError> {
        Ok(self.index.export_csv(filter)?)
    }

    pub fn export_json(&self, filter: &EventFilter) -> Result<String, PipelineError> {
        Ok(self.index.export_json(filter)?)
    }

    pub fn records(&self) -> ProjectRecords {
        let snapshot = self.ledger.snapshot();
        ProjectRecords {
            project: self.name.clone(),
            chapters: self
                .chapters
                .iter()
                .map(|(r, s)| (*r, s.clone()))
                .collect(),
            entities: self.resolver.entities().cloned().collect(),
            assignments: self.resolver.assignments().cloned().collect(),
            merge_suggestions: self
                .resolver
                .merge_suggestions()
                .into_iter()
                .cloned()
                .collect(),
            assertions: snapshot.assertions().to_vec(),
            anchors: snapshot.anchors().to_vec(),
            ledger_events: self.ledger.events().to_vec(),
            conflicts: self.index.records().cloned().collect(),
        }
    }
}
