use serde::{Deserialize, Serialize};

use super::defaults;

/// Full-text screening and duplicate-detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Rubric total at or above which a full text is included.
    pub include_threshold: u8,
    /// Title similarity alone that marks a duplicate.
    pub title_similarity: f64,
    /// Title similarity sufficient when author overlap also matches.
    pub title_similarity_with_authors: f64,
    /// Title similarity sufficient when publication years match.
    pub title_similarity_with_year: f64,
    /// Minimum shared-author ratio for the author corroboration rule.
    pub author_overlap: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            include_threshold: defaults::DEFAULT_INCLUDE_THRESHOLD,
            title_similarity: defaults::DEFAULT_TITLE_SIMILARITY,
            title_similarity_with_authors: defaults::DEFAULT_TITLE_SIMILARITY_WITH_AUTHORS,
            title_similarity_with_year: defaults::DEFAULT_TITLE_SIMILARITY_WITH_YEAR,
            author_overlap: defaults::DEFAULT_AUTHOR_OVERLAP,
        }
    }
}
