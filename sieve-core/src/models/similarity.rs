use serde::{Deserialize, Serialize};

/// Relevance of one reference to the protocol query.
///
/// Produced by ranking; re-ranking overwrites prior scores, it never
/// appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub reference_id: String,
    /// Cosine similarity clamped to [0.0, 1.0].
    pub score: f64,
    /// Dense 0-based position after descending sort.
    pub rank: usize,
}
