use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::MentionKind;

/// Mention extraction and gazetteer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Scan for capitalized tokens the tagger missed and feed the gazetteer.
    pub enable_gazetteer: bool,
    /// Fixed confidence given to tagger mentions (the tagger exposes no score).
    pub baseline_confidence: f64,
    /// Confidence given to gazetteer-sourced candidates.
    pub candidate_confidence: f64,
    /// Kind assigned to newly discovered candidates.
    pub candidate_kind: MentionKind,
    /// Minimum candidate length in characters.
    pub min_candidate_chars: usize,
    /// Gazetteer capacity; additions beyond it are dropped.
    pub max_gazetteer_terms: usize,
    /// Longest multi-token gazetteer term matched.
    pub max_phrase_tokens: usize,
    /// Capitalized words never treated as candidates.
    pub candidate_stopwords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enable_gazetteer: defaults::DEFAULT_ENABLE_GAZETTEER,
            baseline_confidence: defaults::DEFAULT_BASELINE_CONFIDENCE,
            candidate_confidence: defaults::DEFAULT_CANDIDATE_CONFIDENCE,
            candidate_kind: MentionKind::Person,
            min_candidate_chars: defaults::DEFAULT_MIN_CANDIDATE_CHARS,
            max_gazetteer_terms: defaults::DEFAULT_MAX_GAZETTEER_TERMS,
            max_phrase_tokens: defaults::DEFAULT_MAX_PHRASE_TOKENS,
            candidate_stopwords: defaults::DEFAULT_CANDIDATE_STOPWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
