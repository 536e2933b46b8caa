//! Descriptive statistics over a batch of similarity scores.

use serde::{Deserialize, Serialize};
use sieve_core::models::SimilarityScore;

/// Summary of a score distribution, reported alongside batch results so
/// reviewers can sanity-check how discriminative a ranking was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub std_dev: f64,
}

impl ScoreStatistics {
    /// Compute statistics from raw score values. Returns None when the
    /// batch is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let mean = sum / count as f64;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median: percentile(&sorted, 50.0),
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            std_dev: variance.sqrt(),
        })
    }

    pub fn from_scores(scores: &[SimilarityScore]) -> Option<Self> {
        let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
        Self::from_values(&values)
    }

    /// Spread between the quartiles; 0 for single-value batches.
    pub fn iqr(&self) -> f64 {
        self.p75 - self.p25
    }
}

/// Nearest-rank percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[idx.saturating_sub(1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_has_no_statistics() {
        assert!(ScoreStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn single_value_collapses_to_that_value() {
        let stats = ScoreStatistics::from_values(&[0.42]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 0.42);
        assert_eq!(stats.max, 0.42);
        assert_eq!(stats.median, 0.42);
        assert_eq!(stats.p95, 0.42);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn percentiles_use_nearest_rank() {
        let values: Vec<f64> = (1..=10).map(|i| i as f64 / 10.0).collect();
        let stats = ScoreStatistics::from_values(&values).unwrap();
        assert_eq!(stats.median, 0.5);
        assert_eq!(stats.p25, 0.3);
        assert_eq!(stats.p90, 0.9);
        assert_eq!(stats.p95, 1.0);
    }

    #[test]
    fn mean_and_spread_for_known_distribution() {
        let stats = ScoreStatistics::from_values(&[0.2, 0.4, 0.4, 0.6]).unwrap();
        assert!((stats.mean - 0.4).abs() < 1e-12);
        assert!((stats.std_dev - (0.02f64).sqrt()).abs() < 1e-12);
        assert!(stats.iqr() >= 0.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = ScoreStatistics::from_values(&[0.9, 0.1, 0.5]).unwrap();
        let b = ScoreStatistics::from_values(&[0.1, 0.5, 0.9]).unwrap();
        assert_eq!(a, b);
    }
}
