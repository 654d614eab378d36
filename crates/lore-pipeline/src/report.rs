use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lore_core::models::ChapterRef;

/// Where a chapter stands after the last run that saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChapterState {
    Analyzed { fingerprint: String },
    /// The tagger rejected the chapter; retried on the next run.
    Unanalyzed { fingerprint: String, reason: String },
}

impl ChapterState {
    pub fn is_analyzed_as(&self, fingerprint: &str) -> bool {
        matches!(self, Self::Analyzed { fingerprint: f } if f == fingerprint)
    }
}

/// An anchor token that failed validation and was left out of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedAnchor {
    pub chapter: ChapterRef,
    pub token: String,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnanalyzedChapter {
    pub chapter: ChapterRef,
    pub reason: String,
}

/// Summary of one [`crate::Project::analyze`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub project: String,
    /// Stopped early; chapters not reached are picked up by the next run.
    pub cancelled: bool,
    /// First chapter left pending by a cancelled run.
    pub resume_from: Option<ChapterRef>,
    pub analyzed: Vec<ChapterRef>,
    /// Unchanged since their last analysis.
    pub skipped: Vec<ChapterRef>,
    pub unanalyzed: Vec<UnanalyzedChapter>,
    pub dropped_anchors: Vec<DroppedAnchor>,
    /// Annotations whose span lands on no attributed mention.
    pub unattached_annotations: usize,
    pub mentions: usize,
    pub entities: usize,
    pub needs_review: usize,
    pub conflicts: usize,
    pub gazetteer_version: u64,
}

impl AnalysisReport {
    pub(crate) fn new(run_id: Uuid, project: &str) -> Self {
        Self {
            run_id,
            project: project.to_string(),
            cancelled: false,
            resume_from: None,
            analyzed: Vec::new(),
            skipped: Vec::new(),
            unanalyzed: Vec::new(),
            dropped_anchors: Vec::new(),
            unattached_annotations: 0,
            mentions: 0,
            entities: 0,
            needs_review: 0,
            conflicts: 0,
            gazetteer_version: 0,
        }
    }
}
