use serde::{Deserialize, Serialize};

use super::defaults;

/// Event/alert index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Same-type events in one chapter needed to form a hotspot cluster.
    pub cluster_min_size: usize,
    /// Maximum clusters reported (0 = unlimited).
    pub max_clusters: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cluster_min_size: defaults::DEFAULT_CLUSTER_MIN_SIZE,
            max_clusters: defaults::DEFAULT_MAX_CLUSTERS,
        }
    }
}
