use lore_core::errors::TaggerError;
use lore_core::traits::{ITagger, TaggedSpan};

/// Dictionary tagger: tags every whole-word occurrence of a known surface
/// form. Longer entries win over shorter ones at the same position.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    entries: Vec<(Vec<char>, String)>,
}

impl LexiconTagger {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries: Vec<(Vec<char>, String)> = entries
            .into_iter()
            .map(|(surface, label)| (surface.chars().collect(), label.to_string()))
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }
}

impl ITagger for LexiconTagger {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError> {
        let chars: Vec<char> = text.chars().collect();
        let mut taken = vec![false; chars.len()];
        let mut spans = Vec::new();
        for (surface, label) in &self.entries {
            let n = surface.len();
            if n == 0 || n > chars.len() {
                continue;
            }
            for start in 0..=chars.len() - n {
                let end = start + n;
                if chars[start..end] != surface[..] || taken[start..end].iter().any(|t| *t) {
                    continue;
                }
                let left_ok = start == 0 || !chars[start - 1].is_alphanumeric();
                let right_ok = end == chars.len() || !chars[end].is_alphanumeric();
                if left_ok && right_ok {
                    taken[start..end].iter_mut().for_each(|t| *t = true);
                    spans.push(TaggedSpan::new(start, end, label.clone()));
                }
            }
        }
        spans.sort_by_key(|s| s.start);
        Ok(spans)
    }
}

/// Fails with the configured error on any text containing `marker`,
/// otherwise delegates to the inner tagger.
#[derive(Debug, Clone)]
pub struct FailingTagger {
    inner: LexiconTagger,
    marker: String,
    error: TaggerError,
}

impl FailingTagger {
    /// Fails on every input.
    pub fn always(error: TaggerError) -> Self {
        Self {
            inner: LexiconTagger::default(),
            marker: String::new(),
            error,
        }
    }

    pub fn on_marker(inner: LexiconTagger, marker: &str, error: TaggerError) -> Self {
        Self {
            inner,
            marker: marker.to_string(),
            error,
        }
    }

    pub fn model_unavailable() -> TaggerError {
        TaggerError::ModelUnavailable {
            model: "test-model".into(),
            message: "not loaded".into(),
        }
    }

    pub fn unsupported_input() -> TaggerError {
        TaggerError::UnsupportedInput {
            message: "undecodable text".into(),
        }
    }
}

impl ITagger for FailingTagger {
    fn name(&self) -> &str {
        "failing"
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError> {
        if text.contains(&self.marker) {
            return Err(self.error.clone());
        }
        self.inner.tag(text)
    }
}
