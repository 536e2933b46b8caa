//! Cosine similarity and relevance ranking.

use rayon::prelude::*;
use sieve_core::config::defaults::DEFAULT_PARALLEL_THRESHOLD;
use sieve_core::models::SimilarityScore;
use tracing::debug;

/// Cosine similarity clamped to [0.0, 1.0].
///
/// Negative cosines clamp to 0 (anti-correlated text is just irrelevant
/// here), and zero or mismatched vectors score 0 instead of NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Rank references by similarity to the query vector.
///
/// Pure given vectors: descending by score, ties keep input order (stable
/// sort), ranks are dense 0-based positions. Re-running replaces any prior
/// ranking wholesale.
pub fn rank_by_relevance(
    query: &[f32],
    entries: &[(String, Vec<f32>)],
) -> Vec<SimilarityScore> {
    rank_by_relevance_with(query, entries, DEFAULT_PARALLEL_THRESHOLD)
}

/// As [`rank_by_relevance`], with an explicit rayon kick-in threshold.
pub fn rank_by_relevance_with(
    query: &[f32],
    entries: &[(String, Vec<f32>)],
    parallel_threshold: usize,
) -> Vec<SimilarityScore> {
    let score_one = |(id, vector): &(String, Vec<f32>)| SimilarityScore {
        reference_id: id.clone(),
        score: cosine_similarity(query, vector),
        rank: 0,
    };

    let mut scored: Vec<SimilarityScore> = if entries.len() >= parallel_threshold {
        entries.par_iter().map(score_one).collect()
    } else {
        entries.iter().map(score_one).collect()
    };

    // Stable sort: equal scores keep input order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (position, score) in scored.iter_mut().enumerate() {
        score.rank = position;
    }

    debug!(count = scored.len(), "ranked references by relevance");
    scored
}
