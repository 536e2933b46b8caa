//! Layered configuration: one top-level [`SieveConfig`] aggregating
//! per-subsystem sections, each serde-defaulted so partial TOML files work.

pub mod defaults;

mod arbiter_config;
mod cutoff_config;
mod embedding_config;
mod screening_config;
mod triage_config;

pub use arbiter_config::ArbiterConfig;
pub use cutoff_config::CutoffConfig;
pub use embedding_config::{EmbeddingConfig, EmbeddingProviderKind};
pub use screening_config::ScreeningConfig;
pub use triage_config::TriageConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::FULLTEXT_MAX_SCORE;
use crate::errors::{SieveResult, ValidationError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    pub embedding: EmbeddingConfig,
    pub cutoff: CutoffConfig,
    pub arbiter: ArbiterConfig,
    pub screening: ScreeningConfig,
    pub triage: TriageConfig,
}

impl SieveConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(raw: &str) -> SieveResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate.
    pub fn load(path: impl AsRef<Path>) -> SieveResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Reject inconsistent values early, before any engine is built.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.embedding.dimensions == 0 {
            return Err(ValidationError::InvalidConfig {
                field: "embedding.dimensions".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.cutoff.include_band)
            || !(0.0..=1.0).contains(&self.cutoff.exclude_band)
        {
            return Err(ValidationError::InvalidConfig {
                field: "cutoff bands".to_string(),
                reason: "bands must lie in [0, 1]".to_string(),
            });
        }
        if self.cutoff.exclude_band >= self.cutoff.include_band {
            return Err(ValidationError::InvalidConfig {
                field: "cutoff.exclude_band".to_string(),
                reason: "must be below include_band".to_string(),
            });
        }
        if self.cutoff.flatness_epsilon < 0.0 {
            return Err(ValidationError::InvalidConfig {
                field: "cutoff.flatness_epsilon".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        if self.screening.include_threshold > FULLTEXT_MAX_SCORE {
            return Err(ValidationError::InvalidConfig {
                field: "screening.include_threshold".to_string(),
                reason: format!("must be at most {FULLTEXT_MAX_SCORE}"),
            });
        }
        Ok(())
    }
}
