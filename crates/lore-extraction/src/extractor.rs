//! Mention extraction for one chapter.

use std::collections::BTreeSet;
use std::sync::Arc;

use lore_core::config::ExtractionConfig;
use lore_core::constants::BOUNDARY_PUNCTUATION;
use lore_core::errors::ExtractionError;
use lore_core::models::{ChapterRef, Mention, MentionKind, MentionSource, Span};
use lore_core::text::{has_digit, normalize_key, starts_uppercase};
use lore_core::traits::ITagger;
use lore_core::Confidence;
use serde::{Deserialize, Serialize};

use crate::gazetteer::GazetteerSnapshot;
use crate::tokenizer::{only_whitespace_between, tokenize, Token};

/// A capitalized name not yet in the gazetteer, found in this chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredTerm {
    pub surface: String,
    pub kind: MentionKind,
}

/// Output of extracting one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterExtraction {
    pub chapter: ChapterRef,
    /// Ordered by start offset; `ordinal` is the index in this list.
    pub mentions: Vec<Mention>,
    /// New names to commit to the gazetteer, in order of first appearance.
    pub discovered: Vec<DiscoveredTerm>,
    /// Version of the gazetteer snapshot used.
    pub gazetteer_version: u64,
}

#[derive(Debug, Clone)]
struct Candidate {
    span: Span,
    text: String,
    kind: MentionKind,
    confidence: Confidence,
    source: MentionSource,
}

pub struct MentionExtractor {
    tagger: Arc<dyn ITagger>,
    config: ExtractionConfig,
    stopwords: BTreeSet<String>,
}

impl MentionExtractor {
    pub fn new(tagger: Arc<dyn ITagger>, config: ExtractionConfig) -> Self {
        let stopwords = config
            .candidate_stopwords
            .iter()
            .map(|w| normalize_key(w))
            .collect();
        Self {
            tagger,
            config,
            stopwords,
        }
    }

    pub fn tagger_name(&self) -> &str {
        self.tagger.name()
    }

    /// Extract the mentions of one chapter against a frozen gazetteer snapshot.
    ///
    /// Deterministic for identical text, tagger and snapshot.
    pub fn extract(
        &self,
        chapter: ChapterRef,
        text: &str,
        gazetteer: &GazetteerSnapshot,
    ) -> Result<ChapterExtraction, ExtractionError> {
        let tagged = self
            .tagger
            .tag(text)
            .map_err(|source| ExtractionError::TaggerUnavailable { chapter, source })?;

        let chars: Vec<char> = text.chars().collect();
        let mut candidates = Vec::with_capacity(tagged.len());
        for span in tagged {
            let Some(kind) = MentionKind::from_label(&span.label) else {
                continue;
            };
            if span.start >= span.end || span.end > chars.len() {
                tracing::debug!(
                    %chapter,
                    start = span.start,
                    end = span.end,
                    "dropping out-of-bounds tagger span"
                );
                continue;
            }
            let Some(trimmed) = trim_span(&chars, Span::new(span.start, span.end)) else {
                continue;
            };
            candidates.push(Candidate {
                span: trimmed,
                text: chars[trimmed.start..trimmed.end].iter().collect(),
                kind,
                confidence: Confidence::new(self.config.baseline_confidence),
                source: MentionSource::Tagger,
            });
        }

        let mut discovered = Vec::new();
        if self.config.enable_gazetteer {
            let baseline: Vec<Span> = candidates.iter().map(|c| c.span).collect();
            let (found, new_terms) = self.scan_capitalized(text, &chars, &baseline, gazetteer);
            candidates.extend(found);
            discovered = new_terms;
        }

        let mentions = resolve_overlaps(candidates)
            .into_iter()
            .enumerate()
            .map(|(i, c)| Mention {
                chapter,
                ordinal: i as u32,
                text: c.text,
                kind: c.kind,
                span: c.span,
                confidence: c.confidence,
                source: c.source,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            %chapter,
            mentions = mentions.len(),
            discovered = discovered.len(),
            gazetteer_version = gazetteer.version(),
            "chapter extracted"
        );

        Ok(ChapterExtraction {
            chapter,
            mentions,
            discovered,
            gazetteer_version: gazetteer.version(),
        })
    }

    /// Capitalized tokens outside baseline spans: known gazetteer phrases
    /// (longest first), then single-token candidates.
    fn scan_capitalized(
        &self,
        text: &str,
        chars: &[char],
        baseline: &[Span],
        gazetteer: &GazetteerSnapshot,
    ) -> (Vec<Candidate>, Vec<DiscoveredTerm>) {
        let tokens = tokenize(text);
        let covered = |t: &Token| {
            let span = Span::new(t.start, t.end);
            baseline.iter().any(|b| b.overlaps(&span))
        };
        let confidence = Confidence::new(self.config.candidate_confidence);
        let mut found = Vec::new();
        let mut discovered = Vec::new();
        let mut seen_new = BTreeSet::new();

        let mut i = 0;
        while i < tokens.len() {
            let first = &tokens[i];
            if covered(first) || first.sentence_initial || !starts_uppercase(&first.text) {
                i += 1;
                continue;
            }

            if let Some((len, kind)) = self.match_phrase(chars, &tokens[i..], gazetteer, &covered) {
                let last = &tokens[i + len - 1];
                let span = Span::new(first.start, last.end);
                found.push(Candidate {
                    span,
                    text: chars[span.start..span.end].iter().collect(),
                    kind,
                    confidence,
                    source: MentionSource::Gazetteer,
                });
                i += len;
                continue;
            }

            if self.is_candidate(first) {
                let key = normalize_key(&first.text);
                let kind = match gazetteer.get(&key) {
                    Some(term) => term.kind,
                    None => {
                        if seen_new.insert(key) {
                            discovered.push(DiscoveredTerm {
                                surface: first.text.clone(),
                                kind: self.config.candidate_kind,
                            });
                        }
                        self.config.candidate_kind
                    }
                };
                found.push(Candidate {
                    span: Span::new(first.start, first.end),
                    text: first.text.clone(),
                    kind,
                    confidence,
                    source: MentionSource::Gazetteer,
                });
            }
            i += 1;
        }
        (found, discovered)
    }

    /// Longest known multi-token gazetteer term starting at `tokens[0]`.
    fn match_phrase(
        &self,
        chars: &[char],
        tokens: &[Token],
        gazetteer: &GazetteerSnapshot,
        covered: &dyn Fn(&Token) -> bool,
    ) -> Option<(usize, MentionKind)> {
        let max = self.config.max_phrase_tokens.min(tokens.len());
        for len in (2..=max).rev() {
            let window = &tokens[..len];
            let contiguous = window
                .windows(2)
                .all(|w| only_whitespace_between(chars, w[0].end, w[1].start));
            if !contiguous || window.iter().any(covered) {
                continue;
            }
            let phrase = window
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(term) = gazetteer.get(&normalize_key(&phrase)) {
                return Some((len, term.kind));
            }
        }
        None
    }

    fn is_candidate(&self, token: &Token) -> bool {
        token.text.chars().count() >= self.config.min_candidate_chars
            && !has_digit(&token.text)
            && !self.stopwords.contains(&normalize_key(&token.text))
    }
}

/// Strip boundary punctuation and whitespace, adjusting offsets.
fn trim_span(chars: &[char], span: Span) -> Option<Span> {
    let mut start = span.start;
    let mut end = span.end;
    while start < end && is_boundary(chars[start]) {
        start += 1;
    }
    while end > start && is_boundary(chars[end - 1]) {
        end -= 1;
    }
    (start < end).then(|| Span::new(start, end))
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || BOUNDARY_PUNCTUATION.contains(&c)
}

/// Keep the best of overlapping candidates: higher confidence first, then
/// the longer span. Survivors are returned in text order.
fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .value()
            .total_cmp(&a.confidence.value())
            .then_with(|| b.span.len().cmp(&a.span.len()))
            .then_with(|| a.span.start.cmp(&b.span.start))
    });
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| !k.span.overlaps(&candidate.span)) {
            kept.push(candidate);
        }
    }
    kept.sort_by_key(|c| c.span.start);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(start: usize, end: usize, confidence: f64) -> Candidate {
        Candidate {
            span: Span::new(start, end),
            text: String::new(),
            kind: MentionKind::Person,
            confidence: Confidence::new(confidence),
            source: MentionSource::Tagger,
        }
    }

    #[test]
    fn overlap_prefers_confidence_then_length() {
        let kept = resolve_overlaps(vec![
            candidate(0, 4, 0.5),
            candidate(2, 6, 0.8),
            candidate(10, 12, 0.8),
            candidate(9, 15, 0.8),
        ]);
        let spans: Vec<_> = kept.iter().map(|c| (c.span.start, c.span.end)).collect();
        assert_eq!(spans, vec![(2, 6), (9, 15)]);
    }

    #[test]
    fn trim_strips_quotes_and_dashes() {
        let chars: Vec<char> = "«—Juan,»".chars().collect();
        assert_eq!(trim_span(&chars, Span::new(0, 8)), Some(Span::new(2, 6)));
        let dots: Vec<char> = "...".chars().collect();
        assert_eq!(trim_span(&dots, Span::new(0, 3)), None);
    }
}
