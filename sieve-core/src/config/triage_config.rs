use serde::{Deserialize, Serialize};

use super::defaults;
use crate::mode::ClassificationMode;

/// Batch orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub mode: ClassificationMode,
    /// Whether gray-zone references are sent to the arbiter.
    pub llm_fallback: bool,
    /// Batch size above which similarity runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            mode: ClassificationMode::Embedding,
            llm_fallback: true,
            parallel_threshold: defaults::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
