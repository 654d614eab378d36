use serde::{Deserialize, Serialize};

use super::defaults;

/// Temporal anchor validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Upper bound for `age` anchors.
    pub max_age: u32,
    /// Plausible `year` range (inclusive, 4 digits).
    pub min_year: i32,
    pub max_year: i32,
    /// Offsets beyond this magnitude are flagged low-confidence.
    pub lifespan_years: u32,
    /// Maximum spread of implied birth years before a conflict is raised.
    pub birth_year_max_spread: u32,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            max_age: defaults::DEFAULT_MAX_AGE,
            min_year: defaults::DEFAULT_MIN_YEAR,
            max_year: defaults::DEFAULT_MAX_YEAR,
            lifespan_years: defaults::DEFAULT_LIFESPAN_YEARS,
            birth_year_max_spread: defaults::DEFAULT_BIRTH_YEAR_MAX_SPREAD,
        }
    }
}
