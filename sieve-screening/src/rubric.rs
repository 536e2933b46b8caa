//! Full-text scoring rubric.
//!
//! Seven fixed criteria with per-criterion ceilings summing to
//! [`FULLTEXT_MAX_SCORE`]. A total at or above the threshold includes the
//! study; anything else excludes it and reports why, by naming every
//! criterion whose subscore bottomed out at zero. Out-of-range subscores
//! are rejected, never clamped. A silently capped score would misstate
//! what the reviewer entered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sieve_core::config::defaults::DEFAULT_INCLUDE_THRESHOLD;
use sieve_core::constants::FULLTEXT_MAX_SCORE;
use sieve_core::errors::ScreeningError;
use sieve_core::{DecisionLabel, Stage, TemporalRange};
use tracing::debug;

/// One rubric criterion: name, score ceiling, and the exclusion reason
/// reported when the subscore is zero.
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
    pub name: &'static str,
    pub max: u8,
    pub exclusion_reason: &'static str,
}

/// The fixed rubric. Order matters: exclusion reasons are reported in
/// this order.
pub static RUBRIC: [Criterion; 7] = [
    Criterion {
        name: "relevance",
        max: 2,
        exclusion_reason: "topic not related to the research question",
    },
    Criterion {
        name: "intervention_present",
        max: 2,
        exclusion_reason: "intervention or comparison not present or unclear",
    },
    Criterion {
        name: "method_validity",
        max: 2,
        exclusion_reason: "methodology not valid or not adequately described",
    },
    Criterion {
        name: "data_reported",
        max: 2,
        exclusion_reason: "no empirical data or results reported",
    },
    Criterion {
        name: "text_accessible",
        max: 1,
        exclusion_reason: "full text not accessible",
    },
    Criterion {
        name: "date_range",
        max: 1,
        exclusion_reason: "publication outside the review's temporal range",
    },
    Criterion {
        name: "method_quality",
        max: 2,
        exclusion_reason: "insufficient methodological quality",
    },
];

/// Reviewer-entered subscores, one per rubric criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscores {
    pub relevance: u8,
    pub intervention_present: u8,
    pub method_validity: u8,
    pub data_reported: u8,
    pub text_accessible: u8,
    pub date_range: u8,
    pub method_quality: u8,
}

impl Subscores {
    fn values(&self) -> [u8; 7] {
        [
            self.relevance,
            self.intervention_present,
            self.method_validity,
            self.data_reported,
            self.text_accessible,
            self.date_range,
            self.method_quality,
        ]
    }

    /// Reject any subscore above its criterion ceiling.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        for (criterion, value) in RUBRIC.iter().zip(self.values()) {
            if value > criterion.max {
                return Err(ScreeningError::InvalidSubscore {
                    criterion: criterion.name.to_string(),
                    value,
                    max: criterion.max,
                });
            }
        }
        Ok(())
    }

    pub fn total(&self) -> u8 {
        self.values().iter().sum()
    }

    /// Exclusion reasons for every zeroed criterion, in rubric order.
    pub fn exclusion_reasons(&self) -> Vec<String> {
        RUBRIC
            .iter()
            .zip(self.values())
            .filter(|(_, value)| *value == 0)
            .map(|(criterion, _)| criterion.exclusion_reason.to_string())
            .collect()
    }
}

/// A completed full-text assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub reference_id: String,
    pub reviewer: String,
    pub stage: Stage,
    pub subscores: Subscores,
    pub total: u8,
    pub threshold: u8,
    pub decision: DecisionLabel,
    /// Populated only for excluded records.
    pub exclusion_reasons: Vec<String>,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Score a full text against the rubric.
///
/// A `threshold` of `None` uses the default. Included records carry no
/// exclusion reasons even when individual subscores are zero; the total
/// carried the study over the line.
pub fn score_full_text(
    reference_id: impl Into<String>,
    reviewer: impl Into<String>,
    subscores: Subscores,
    threshold: Option<u8>,
    comment: Option<String>,
) -> Result<ScreeningRecord, ScreeningError> {
    let reviewer = reviewer.into();
    if reviewer.trim().is_empty() {
        return Err(ScreeningError::MissingReviewer);
    }
    subscores.validate()?;

    let threshold = threshold.unwrap_or(DEFAULT_INCLUDE_THRESHOLD);
    if threshold > FULLTEXT_MAX_SCORE {
        return Err(ScreeningError::InvalidThreshold {
            value: threshold,
            max: FULLTEXT_MAX_SCORE,
        });
    }

    let reference_id = reference_id.into();
    let total = subscores.total();
    let decision = if total >= threshold {
        DecisionLabel::Include
    } else {
        DecisionLabel::Exclude
    };
    let exclusion_reasons = if decision == DecisionLabel::Exclude {
        subscores.exclusion_reasons()
    } else {
        Vec::new()
    };

    debug!(
        reference_id = %reference_id,
        total,
        threshold,
        decision = %decision,
        "full text scored"
    );

    Ok(ScreeningRecord {
        reference_id,
        reviewer,
        stage: Stage::FullText,
        subscores,
        total,
        threshold,
        decision,
        exclusion_reasons,
        comment,
        reviewed_at: Utc::now(),
    })
}

/// Derive the temporal subscore from a publication year and the review's
/// window. Benefit of the doubt when either side is missing.
pub fn date_range_subscore(year: Option<i32>, range: Option<&TemporalRange>) -> u8 {
    match (year, range) {
        (Some(y), Some(r)) if !r.contains(y) => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rubric_ceilings_sum_to_the_max_score() {
        let sum: u8 = RUBRIC.iter().map(|c| c.max).sum();
        assert_eq!(sum, FULLTEXT_MAX_SCORE);
    }

    #[test]
    fn full_marks_total_twelve() {
        let subscores = Subscores {
            relevance: 2,
            intervention_present: 2,
            method_validity: 2,
            data_reported: 2,
            text_accessible: 1,
            date_range: 1,
            method_quality: 2,
        };
        assert!(subscores.validate().is_ok());
        assert_eq!(subscores.total(), FULLTEXT_MAX_SCORE);
        assert!(subscores.exclusion_reasons().is_empty());
    }

    #[test]
    fn overrange_subscore_is_rejected_with_the_criterion_named() {
        let subscores = Subscores {
            text_accessible: 2,
            ..Subscores::default()
        };
        match subscores.validate().unwrap_err() {
            ScreeningError::InvalidSubscore {
                criterion,
                value,
                max,
            } => {
                assert_eq!(criterion, "text_accessible");
                assert_eq!(value, 2);
                assert_eq!(max, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reasons_follow_rubric_order() {
        let subscores = Subscores {
            relevance: 1,
            intervention_present: 0,
            method_validity: 2,
            data_reported: 1,
            text_accessible: 0,
            date_range: 1,
            method_quality: 0,
        };
        let reasons = subscores.exclusion_reasons();
        assert_eq!(
            reasons,
            vec![
                "intervention or comparison not present or unclear",
                "full text not accessible",
                "insufficient methodological quality",
            ]
        );
    }

    #[test]
    fn missing_reviewer_is_rejected() {
        let result = score_full_text("r1", "  ", Subscores::default(), None, None);
        assert!(matches!(result, Err(ScreeningError::MissingReviewer)));
    }

    #[test]
    fn unreachable_threshold_is_rejected() {
        let result = score_full_text("r1", "alice", Subscores::default(), Some(13), None);
        assert!(matches!(
            result,
            Err(ScreeningError::InvalidThreshold { value: 13, max: 12 })
        ));
    }

    #[test]
    fn year_window_subscore() {
        let range = TemporalRange::new(2015, 2025).unwrap();
        assert_eq!(date_range_subscore(Some(2020), Some(&range)), 1);
        assert_eq!(date_range_subscore(Some(2010), Some(&range)), 0);
        assert_eq!(date_range_subscore(None, Some(&range)), 1);
        assert_eq!(date_range_subscore(Some(1990), None), 1);
    }
}
