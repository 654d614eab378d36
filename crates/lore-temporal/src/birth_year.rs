//! Birth-year inference from (calendar year, age) observations.

use serde::{Deserialize, Serialize};

/// Result of inferring a birth year from several observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthYearEstimate {
    /// Median implied birth year (lower median on even counts).
    pub year: i32,
    pub min: i32,
    pub max: i32,
    pub samples: usize,
}

impl BirthYearEstimate {
    /// Distance between the earliest and latest implied birth years.
    pub fn spread(&self) -> u32 {
        self.min.abs_diff(self.max)
    }
}

/// Infer a birth year as the median of `year - age` over the observations.
/// Returns `None` when there are no observations.
pub fn infer_birth_year(observations: &[(i32, u32)]) -> Option<BirthYearEstimate> {
    let mut implied: Vec<i32> = observations
        .iter()
        .filter_map(|&(year, age)| year.checked_sub(i32::try_from(age).ok()?))
        .collect();
    if implied.is_empty() {
        return None;
    }
    implied.sort_unstable();
    let median = implied[(implied.len() - 1) / 2];
    Some(BirthYearEstimate {
        year: median,
        min: implied[0],
        max: implied[implied.len() - 1],
        samples: implied.len(),
    })
}
