use serde::{Deserialize, Serialize};

use super::defaults;

/// Project analysis pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Chapters extracted concurrently per wave. 1 = strictly sequential.
    pub parallelism: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallelism: defaults::DEFAULT_PARALLELISM,
        }
    }
}
