//! # sieve-ranking
//!
//! Pure ranking layer: cosine similarity between the protocol query vector
//! and reference vectors, a knee-based cutoff detector that partitions the
//! ranking into include / gray / exclude, and distribution statistics for
//! batch summaries.
//!
//! Everything here is synchronous and deterministic; large batches fan out
//! on the rayon pool.

pub mod cutoff;
pub mod similarity;
pub mod statistics;

pub use cutoff::{detect_cutoff, CutoffMethod, CutoffResult};
pub use similarity::{cosine_similarity, rank_by_relevance, rank_by_relevance_with};
pub use statistics::ScoreStatistics;
