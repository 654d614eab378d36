use serde::{Deserialize, Serialize};

use super::defaults;

/// Entity resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Assignments below this confidence are flagged "needs review".
    pub review_threshold: f64,
    /// Confidence of an exact alias match.
    pub exact_alias_confidence: f64,
    /// Confidence of a unique partial match ("Juan" → "Juan García").
    pub subset_confidence: f64,
    /// Confidence of a unique fuller-name match ("Juan García" → "Juan").
    pub superset_confidence: f64,
    /// Penalty per in-scope entity sharing a name token without matching.
    pub near_name_penalty: f64,
    /// Multiplier when a gazetteer mention attaches to an entity of another kind.
    pub cross_kind_penalty: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            review_threshold: defaults::DEFAULT_REVIEW_THRESHOLD,
            exact_alias_confidence: defaults::DEFAULT_EXACT_ALIAS_CONFIDENCE,
            subset_confidence: defaults::DEFAULT_SUBSET_CONFIDENCE,
            superset_confidence: defaults::DEFAULT_SUPERSET_CONFIDENCE,
            near_name_penalty: defaults::DEFAULT_NEAR_NAME_PENALTY,
            cross_kind_penalty: defaults::DEFAULT_CROSS_KIND_PENALTY,
        }
    }
}
