use serde::{Deserialize, Serialize};

use super::defaults;

/// Cutoff-detection configuration.
///
/// The knee heuristic is primary; when the score curve is flatter than
/// `flatness_epsilon` both thresholds come from the fixed bands instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    /// Minimum knee depth (max distance to chord) for the knee to count.
    pub flatness_epsilon: f64,
    /// Band fallback: scores above this are included.
    pub include_band: f64,
    /// Band fallback: scores below this are excluded.
    pub exclude_band: f64,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            flatness_epsilon: defaults::DEFAULT_FLATNESS_EPSILON,
            include_band: defaults::DEFAULT_INCLUDE_BAND,
            exclude_band: defaults::DEFAULT_EXCLUDE_BAND,
        }
    }
}
