use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Publication-year window for a review. A year outside the window is a
/// scoring input downstream, never a hard filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRange {
    pub start_year: i32,
    pub end_year: i32,
}

impl TemporalRange {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, ValidationError> {
        if start_year > end_year {
            return Err(ValidationError::InvalidTemporalRange {
                start: start_year,
                end: end_year,
            });
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start_year && year <= self.end_year
    }
}

/// A systematic-review protocol: the PICO frame plus eligibility criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Protocol {
    pub id: String,
    /// PICO: population under study.
    pub population: String,
    /// PICO: intervention of interest.
    pub intervention: String,
    /// PICO: comparison arm, may be empty.
    pub comparison: String,
    /// PICO: outcome of interest.
    pub outcome: String,
    pub inclusion_criteria: Vec<String>,
    pub exclusion_criteria: Vec<String>,
    pub temporal_range: Option<TemporalRange>,
}

impl Protocol {
    /// Check the protocol is complete enough to screen against.
    ///
    /// Both criteria lists must be non-empty and the temporal range, when
    /// present, must be ordered.
    pub fn validate_for_screening(&self) -> Result<(), ValidationError> {
        if self.inclusion_criteria.iter().all(|c| c.trim().is_empty()) {
            return Err(ValidationError::EmptyCriteria {
                which: "inclusion".to_string(),
            });
        }
        if self.exclusion_criteria.iter().all(|c| c.trim().is_empty()) {
            return Err(ValidationError::EmptyCriteria {
                which: "exclusion".to_string(),
            });
        }
        if let Some(range) = &self.temporal_range {
            if range.start_year > range.end_year {
                return Err(ValidationError::InvalidTemporalRange {
                    start: range.start_year,
                    end: range.end_year,
                });
            }
        }
        Ok(())
    }
}
