//! Value equivalence for categorical attributes.

use std::collections::BTreeMap;

use lore_core::text::{key_tokens, normalize_key};

/// Accent/case-insensitive comparison plus synonym groups, applied per token
/// ("castaño oscuro" ≡ "marrón oscuro").
#[derive(Debug, Clone, Default)]
pub struct ValueEquivalence {
    /// Normalized member → normalized first member of its group.
    canonical: BTreeMap<String, String>,
}

impl ValueEquivalence {
    pub fn new(groups: &[Vec<String>]) -> Self {
        let mut canonical = BTreeMap::new();
        for group in groups {
            let Some(head) = group.first().map(|v| normalize_key(v)) else {
                continue;
            };
            for member in group {
                // A value listed in two groups keeps its first.
                canonical
                    .entry(normalize_key(member))
                    .or_insert_with(|| head.clone());
            }
        }
        Self { canonical }
    }

    /// Canonical form of a value.
    pub fn canonical(&self, value: &str) -> String {
        let key = normalize_key(value);
        if let Some(head) = self.canonical.get(&key) {
            return head.clone();
        }
        key_tokens(&key)
            .into_iter()
            .map(|t| self.canonical.get(t).map_or(t, String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colours() -> ValueEquivalence {
        ValueEquivalence::new(&[
            vec!["castaño".into(), "marrón".into()],
            vec!["verde".into(), "verdes".into()],
        ])
    }

    #[test]
    fn synonyms_and_accents() {
        let eq = colours();
        assert!(eq.equivalent("Castaño", "marron"));
        assert!(eq.equivalent("verdes", "VERDE"));
        assert!(!eq.equivalent("verde", "marrón"));
    }

    #[test]
    fn multi_token_values_compare_per_token() {
        let eq = colours();
        assert!(eq.equivalent("castaño oscuro", "marrón  oscuro"));
        assert!(!eq.equivalent("castaño oscuro", "castaño claro"));
    }

    #[test]
    fn unknown_values_fall_back_to_normalized_text() {
        let eq = ValueEquivalence::default();
        assert!(eq.equivalent("Médico", "medico"));
        assert!(!eq.equivalent("médico", "herrero"));
    }
}
