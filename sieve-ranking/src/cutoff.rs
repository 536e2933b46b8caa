//! Cutoff detection over a descending score curve.
//!
//! Primary heuristic: the knee of the curve, located as the point of
//! maximum perpendicular distance to the chord from first to last score.
//! Which boundary a knee marks depends on its side of the chord: a knee
//! above the chord is the last point of the leading plateau (include ends
//! after it), one below the chord is the first point of the floor
//! (exclude starts at it). The remaining segment is re-kneed once to find
//! the other boundary, and whatever is left between the two is the gray
//! zone.
//!
//! When the curve is flatter than `flatness_epsilon` there is no usable
//! geometry and both thresholds come from fixed score bands instead;
//! never a mix of one knee threshold and one band threshold, since mixed
//! policies can invert `high >= low`.
//!
//! Batches under [`MIN_CUTOFF_BATCH`] carry too little shape to infer
//! anything: everything lands in the gray zone.

use serde::{Deserialize, Serialize};
use sieve_core::config::CutoffConfig;
use sieve_core::constants::MIN_CUTOFF_BATCH;
use sieve_core::models::SimilarityScore;
use tracing::debug;

/// How the thresholds were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffMethod {
    /// Dual-knee geometry on the score curve.
    Knee,
    /// Fixed band fallback for flat curves.
    Bands,
    /// Batch below the minimum size; no inference.
    TooFew,
}

/// Partition of a ranking into include / gray / exclude.
///
/// Reference ids appear in rank order; the three lists partition the
/// input and the gray zone is always a contiguous slice of the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffResult {
    /// Score at or above which references auto-include.
    pub high_threshold: f64,
    /// Score below which references auto-exclude.
    pub low_threshold: f64,
    pub include: Vec<String>,
    pub gray: Vec<String>,
    pub exclude: Vec<String>,
    pub method: CutoffMethod,
}

impl CutoffResult {
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.include.len(), self.gray.len(), self.exclude.len())
    }
}

/// Which side of the chord the knee sits on. On a descending curve a
/// plateau-then-drop bend bulges above the chord and a drop-then-floor
/// bend sags below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChordSide {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy)]
struct Knee {
    index: usize,
    depth: f64,
    side: ChordSide,
}

/// Knee of the curve: the point with maximum perpendicular distance to
/// the chord from the first to the last point. None when the curve has
/// fewer than 3 points or the chord has no length.
fn knee(values: &[f64]) -> Option<Knee> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (x0, y0) = (0.0f64, values[0]);
    let (x1, y1) = ((n - 1) as f64, values[n - 1]);
    let chord_len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
    if chord_len <= f64::EPSILON {
        return None;
    }

    let mut best: Option<Knee> = None;
    for (i, &v) in values.iter().enumerate().take(n - 1).skip(1) {
        let x = i as f64;
        // Signed offset from the chord; positive means below it on a
        // descending curve.
        let signed = (y1 - y0) * x - (x1 - x0) * v + x1 * y0 - y1 * x0;
        let depth = signed.abs() / chord_len;
        if best.map_or(true, |b| depth > b.depth) {
            best = Some(Knee {
                index: i,
                depth,
                side: if signed > 0.0 {
                    ChordSide::Below
                } else {
                    ChordSide::Above
                },
            });
        }
    }
    best
}

/// Partition a ranking. Scores must come from [`rank_by_relevance`]; they
/// are re-sorted by rank defensively.
///
/// [`rank_by_relevance`]: crate::similarity::rank_by_relevance
pub fn detect_cutoff(scores: &[SimilarityScore], config: &CutoffConfig) -> CutoffResult {
    let mut ordered: Vec<&SimilarityScore> = scores.iter().collect();
    ordered.sort_by_key(|s| s.rank);
    let ids: Vec<String> = ordered.iter().map(|s| s.reference_id.clone()).collect();
    let values: Vec<f64> = ordered.iter().map(|s| s.score).collect();
    let n = values.len();

    if n < MIN_CUTOFF_BATCH {
        debug!(count = n, "batch below minimum, all gray zone");
        return CutoffResult {
            high_threshold: 1.0,
            low_threshold: 0.0,
            include: Vec::new(),
            gray: ids,
            exclude: Vec::new(),
            method: CutoffMethod::TooFew,
        };
    }

    match knee(&values) {
        Some(k) if k.depth >= config.flatness_epsilon => {
            let (hi_end, lo_start) = match k.side {
                // Plateau edge found first: include through the knee,
                // then look for the floor in the tail. A flat tail
                // auto-excludes nothing.
                ChordSide::Above => {
                    let hi_end = k.index + 1;
                    let lo_start = match knee(&values[hi_end..]) {
                        Some(t) if t.depth >= config.flatness_epsilon => match t.side {
                            ChordSide::Below => hi_end + t.index,
                            ChordSide::Above => hi_end + t.index + 1,
                        },
                        _ => n,
                    };
                    (hi_end, lo_start)
                }
                // Floor edge found first: exclude from the knee on, then
                // look for the plateau in the head. A flat head
                // auto-includes nothing.
                ChordSide::Below => {
                    let lo_start = k.index;
                    let hi_end = match knee(&values[..lo_start]) {
                        Some(h) if h.depth >= config.flatness_epsilon => match h.side {
                            ChordSide::Above => h.index + 1,
                            ChordSide::Below => h.index,
                        },
                        _ => 0,
                    };
                    (hi_end, lo_start)
                }
            };

            // Thresholds at the midpoints of the boundary gaps. An empty
            // include set pins the high threshold above every score.
            let high_threshold = if hi_end == 0 {
                1.0
            } else if hi_end < n {
                (values[hi_end - 1] + values[hi_end]) / 2.0
            } else {
                values[n - 1]
            };
            let low_threshold = if lo_start < n {
                (values[lo_start - 1] + values[lo_start]) / 2.0
            } else {
                0.0
            };

            debug!(
                knee_depth = k.depth,
                include = hi_end,
                gray = lo_start - hi_end,
                exclude = n - lo_start,
                "knee cutoff detected"
            );

            CutoffResult {
                high_threshold,
                low_threshold,
                include: ids[..hi_end].to_vec(),
                gray: ids[hi_end..lo_start].to_vec(),
                exclude: ids[lo_start..].to_vec(),
                method: CutoffMethod::Knee,
            }
        }
        _ => {
            // Flat curve: fixed bands on the score values. The ranking is
            // descending, so the three segments stay contiguous.
            let hi_end = values.partition_point(|&v| v > config.include_band);
            let lo_start = hi_end + values[hi_end..].partition_point(|&v| v >= config.exclude_band);

            debug!(
                include = hi_end,
                gray = lo_start - hi_end,
                exclude = n - lo_start,
                "flat curve, band cutoff applied"
            );

            CutoffResult {
                high_threshold: config.include_band,
                low_threshold: config.exclude_band,
                include: ids[..hi_end].to_vec(),
                gray: ids[hi_end..lo_start].to_vec(),
                exclude: ids[lo_start..].to_vec(),
                method: CutoffMethod::Bands,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores(values: &[f64]) -> Vec<SimilarityScore> {
        values
            .iter()
            .enumerate()
            .map(|(i, &score)| SimilarityScore {
                reference_id: format!("r{i}"),
                score,
                rank: i,
            })
            .collect()
    }

    #[test]
    fn tiny_batch_is_all_gray() {
        let result = detect_cutoff(&scores(&[0.9, 0.5, 0.1, 0.05]), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::TooFew);
        assert_eq!(result.counts(), (0, 4, 0));
    }

    #[test]
    fn bimodal_curve_splits_at_both_bends() {
        let values = [0.92, 0.90, 0.88, 0.86, 0.30, 0.12, 0.10, 0.08, 0.06, 0.05];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::Knee);
        // Plateau auto-includes, floor auto-excludes, the lone mid score
        // stays gray.
        assert_eq!(result.counts(), (4, 1, 5));
        assert_eq!(result.gray, vec!["r4".to_string()]);
        assert!(
            result.high_threshold >= result.low_threshold,
            "thresholds out of order: {} < {}",
            result.high_threshold,
            result.low_threshold
        );
    }

    #[test]
    fn single_straggler_between_plateau_and_floor_is_gray() {
        let values = [
            0.95, 0.93, 0.91, 0.89, 0.87, 0.85, 0.25, 0.06, 0.05, 0.04, 0.03, 0.02,
        ];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::Knee);
        assert_eq!(result.counts(), (6, 1, 5));
        assert_eq!(result.gray, vec!["r6".to_string()]);
    }

    #[test]
    fn plateau_with_linear_tail_excludes_nothing() {
        // Clear plateau, then a linear slope: no floor bend to cut at.
        let values = [0.90, 0.88, 0.86, 0.84, 0.82, 0.80, 0.60, 0.47, 0.34, 0.21];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::Knee);
        assert_eq!(result.counts(), (6, 4, 0));
        assert_eq!(result.low_threshold, 0.0);
    }

    #[test]
    fn flat_curve_falls_back_to_bands() {
        let values = [0.50, 0.45, 0.40, 0.35, 0.31, 0.25, 0.20, 0.15, 0.09, 0.05];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::Bands);
        // > 0.30 includes, < 0.10 excludes, rest is gray.
        assert_eq!(result.counts(), (5, 3, 2));
        assert_eq!(result.high_threshold, 0.30);
        assert_eq!(result.low_threshold, 0.10);
    }

    #[test]
    fn identical_scores_in_band_middle_are_all_gray() {
        let values = [0.2; 8];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::Bands);
        assert_eq!(result.counts(), (0, 8, 0));
    }

    #[test]
    fn uniformly_high_flat_scores_all_include() {
        let values = [0.8; 6];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        assert_eq!(result.method, CutoffMethod::Bands);
        assert_eq!(result.counts(), (6, 0, 0));
    }

    #[test]
    fn partition_is_ordered_and_contiguous() {
        let values = [0.95, 0.91, 0.72, 0.68, 0.33, 0.29, 0.17, 0.08, 0.04, 0.02];
        let result = detect_cutoff(&scores(&values), &CutoffConfig::default());
        let all: Vec<&String> = result
            .include
            .iter()
            .chain(&result.gray)
            .chain(&result.exclude)
            .collect();
        // Concatenation reproduces the ranking exactly.
        for (i, id) in all.iter().enumerate() {
            assert_eq!(**id, format!("r{i}"));
        }
    }

    proptest! {
        #[test]
        fn invariants_hold_for_arbitrary_descending_curves(
            raw in proptest::collection::vec(0.0f64..=1.0, 0..60)
        ) {
            let mut values = raw;
            values.sort_by(|a, b| b.partial_cmp(a).unwrap());
            let result = detect_cutoff(&scores(&values), &CutoffConfig::default());

            // The three sets partition the input.
            prop_assert_eq!(
                result.include.len() + result.gray.len() + result.exclude.len(),
                values.len()
            );
            // Ordering invariant: min(include) >= max(gray) >= ... via
            // contiguity of the descending ranking.
            let hi_end = result.include.len();
            let lo_start = hi_end + result.gray.len();
            if hi_end > 0 && hi_end < values.len() {
                prop_assert!(values[hi_end - 1] >= values[hi_end]);
            }
            if lo_start > 0 && lo_start < values.len() {
                prop_assert!(values[lo_start - 1] >= values[lo_start]);
            }
            prop_assert!(result.high_threshold >= result.low_threshold);
            if values.len() < MIN_CUTOFF_BATCH {
                prop_assert_eq!(result.method, CutoffMethod::TooFew);
                prop_assert_eq!(result.gray.len(), values.len());
            }
        }
    }
}
