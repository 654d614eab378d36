use std::collections::BTreeSet;

use lore_core::config::{ConsistencyConfig, TemporalConfig};
use lore_core::text::normalize_key;
use serde::{Deserialize, Serialize};

use crate::equivalence::ValueEquivalence;

/// How an attribute may evolve over story time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributePolicy {
    /// May change over time; conflicts only at the same instant.
    Mutable,
    /// Never changes; conflicts at any comparable pair of instants.
    Immutable,
    /// Numeric, checked against elapsed story time.
    Continuous,
}

/// Detector settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct DetectionRules {
    pub high_confidence: f64,
    pub age_tolerance_years: u32,
    pub birth_year_max_spread: u32,
    /// Upper bound for continuous values, shared with the anchor parser.
    pub max_age: u32,
    pub equivalence: ValueEquivalence,
    immutable: BTreeSet<String>,
    continuous: BTreeSet<String>,
}

impl DetectionRules {
    pub fn from_config(consistency: &ConsistencyConfig, temporal: &TemporalConfig) -> Self {
        Self {
            high_confidence: consistency.high_confidence,
            age_tolerance_years: consistency.age_tolerance_years,
            birth_year_max_spread: temporal.birth_year_max_spread,
            max_age: temporal.max_age,
            equivalence: ValueEquivalence::new(&consistency.synonym_groups),
            immutable: consistency
                .immutable_attributes
                .iter()
                .map(|a| normalize_key(a))
                .collect(),
            continuous: consistency
                .continuous_attributes
                .iter()
                .map(|a| normalize_key(a))
                .collect(),
        }
    }

    pub fn policy(&self, attribute: &str) -> AttributePolicy {
        let key = normalize_key(attribute);
        if self.continuous.contains(&key) {
            AttributePolicy::Continuous
        } else if self.immutable.contains(&key) {
            AttributePolicy::Immutable
        } else {
            AttributePolicy::Mutable
        }
    }

    /// A continuous value as a whole number in `0..=max_age`. Anything else
    /// is skipped by the numeric checks.
    pub fn continuous_value(&self, value: &str) -> Option<u32> {
        let parsed = value.trim().parse::<u32>().ok()?;
        (parsed <= self.max_age).then_some(parsed)
    }
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self::from_config(&ConsistencyConfig::default(), &TemporalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policies() {
        let rules = DetectionRules::default();
        assert_eq!(rules.policy("eye_color"), AttributePolicy::Immutable);
        assert_eq!(rules.policy("Age"), AttributePolicy::Continuous);
        assert_eq!(rules.policy("profession"), AttributePolicy::Mutable);
    }

    #[test]
    fn continuous_values_are_bounded() {
        let rules = DetectionRules::default();
        assert_eq!(rules.continuous_value(" 42 "), Some(42));
        assert_eq!(rules.continuous_value(&rules.max_age.to_string()), Some(rules.max_age));
        assert_eq!(rules.continuous_value(&(rules.max_age + 1).to_string()), None);
        assert_eq!(rules.continuous_value("-3"), None);
        assert_eq!(rules.continuous_value("9223372036854775807"), None);
        assert_eq!(rules.continuous_value("treinta"), None);
    }
}
