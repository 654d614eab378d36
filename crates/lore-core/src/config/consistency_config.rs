use serde::{Deserialize, Serialize};

use super::defaults;

/// What to do with attribute annotations that carry no temporal anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnanchoredPolicy {
    /// Anchor to the chapter itself: comparable only within that chapter.
    ChapterLocal,
    /// Drop the annotation.
    Skip,
}

/// Consistency detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Assertions at or above this confidence count as high-confidence.
    pub high_confidence: f64,
    /// Allowed drift between age delta and elapsed story time.
    pub age_tolerance_years: u32,
    /// Categorical attributes that may never change over time.
    pub immutable_attributes: Vec<String>,
    /// Numeric attributes checked by age progression.
    pub continuous_attributes: Vec<String>,
    /// Groups of values treated as equivalent.
    pub synonym_groups: Vec<Vec<String>>,
    pub unanchored_policy: UnanchoredPolicy,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            high_confidence: defaults::DEFAULT_HIGH_CONFIDENCE,
            age_tolerance_years: defaults::DEFAULT_AGE_TOLERANCE_YEARS,
            immutable_attributes: to_strings(defaults::DEFAULT_IMMUTABLE_ATTRIBUTES),
            continuous_attributes: to_strings(defaults::DEFAULT_CONTINUOUS_ATTRIBUTES),
            synonym_groups: defaults::DEFAULT_SYNONYM_GROUPS
                .iter()
                .map(|g| to_strings(g))
                .collect(),
            unanchored_policy: UnanchoredPolicy::ChapterLocal,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
