//! Configuration for the lore engine.
//!
//! Every section uses `#[serde(default)]`, so a partial TOML file only
//! overrides the keys it names. All defaults live in [`defaults`].

pub mod consistency_config;
pub mod defaults;
pub mod extraction_config;
pub mod index_config;
pub mod observability_config;
pub mod pipeline_config;
pub mod resolution_config;
pub mod temporal_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use consistency_config::{ConsistencyConfig, UnanchoredPolicy};
pub use extraction_config::ExtractionConfig;
pub use index_config::IndexConfig;
pub use observability_config::ObservabilityConfig;
pub use pipeline_config::PipelineConfig;
pub use resolution_config::ResolutionConfig;
pub use temporal_config::TemporalConfig;

use crate::errors::ConfigError;

/// Environment variable overriding `pipeline.parallelism`.
pub const ENV_PARALLELISM: &str = "LORE_PARALLELISM";
/// Environment variable overriding `resolution.review_threshold`.
pub const ENV_REVIEW_THRESHOLD: &str = "LORE_REVIEW_THRESHOLD";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "LORE_LOG_LEVEL";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`LORE_*`)
/// 2. Project config file
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoreConfig {
    pub extraction: ExtractionConfig,
    pub resolution: ResolutionConfig,
    pub temporal: TemporalConfig,
    pub consistency: ConsistencyConfig,
    pub index: IndexConfig,
    pub pipeline: PipelineConfig,
    pub observability: ObservabilityConfig,
}

impl LoreConfig {
    /// Load a config file, apply `LORE_*` environment overrides, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: LoreConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.apply_env_overrides()?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a config from a TOML string. No environment overrides.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: LoreConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LORE_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Split out so tests do not
    /// have to mutate the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PARALLELISM) {
            self.pipeline.parallelism =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: ENV_PARALLELISM.to_string(),
                    message: format!("expected a positive integer, got {raw:?}"),
                })?;
        }
        if let Some(raw) = lookup(ENV_REVIEW_THRESHOLD) {
            self.resolution.review_threshold =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: ENV_REVIEW_THRESHOLD.to_string(),
                    message: format!("expected a number, got {raw:?}"),
                })?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.observability.log_level = raw.trim().to_string();
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("extraction.baseline_confidence", self.extraction.baseline_confidence),
            ("extraction.candidate_confidence", self.extraction.candidate_confidence),
            ("resolution.review_threshold", self.resolution.review_threshold),
            ("resolution.exact_alias_confidence", self.resolution.exact_alias_confidence),
            ("resolution.subset_confidence", self.resolution.subset_confidence),
            ("resolution.superset_confidence", self.resolution.superset_confidence),
            ("resolution.near_name_penalty", self.resolution.near_name_penalty),
            ("resolution.cross_kind_penalty", self.resolution.cross_kind_penalty),
            ("consistency.high_confidence", self.consistency.high_confidence),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }

        let temporal = &self.temporal;
        for (field, year) in [
            ("temporal.min_year", temporal.min_year),
            ("temporal.max_year", temporal.max_year),
        ] {
            if !(1000..=9999).contains(&year) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be a 4-digit year".to_string(),
                });
            }
        }
        if temporal.min_year > temporal.max_year {
            return Err(ConfigError::ValidationFailed {
                field: "temporal.min_year".to_string(),
                message: "must not exceed temporal.max_year".to_string(),
            });
        }
        if self.pipeline.parallelism == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "pipeline.parallelism".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.index.cluster_min_size < 2 {
            return Err(ConfigError::ValidationFailed {
                field: "index.cluster_min_size".to_string(),
                message: "must be at least 2".to_string(),
            });
        }
        if self.extraction.max_phrase_tokens == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "extraction.max_phrase_tokens".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
