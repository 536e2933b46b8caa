use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence score clamped to [0.0, 1.0].
/// Represents how sure the engine is about a screening decision.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// High confidence. Decisions above this need no second look.
    pub const HIGH: f64 = 0.8;
    /// Medium confidence.
    pub const MEDIUM: f64 = 0.5;
    /// Low confidence, the floor assigned to fallback `maybe` decisions.
    pub const LOW: f64 = 0.2;

    /// Create a new Confidence, clamping to [0.0, 1.0]. NaN clamps to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_high(self) -> bool {
        self.0 >= Self::HIGH
    }

    pub fn is_low(self) -> bool {
        self.0 <= Self::LOW
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(Self::MEDIUM)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Confidence::new(1.5).value(), 1.0);
        assert_eq!(Confidence::new(-0.3).value(), 0.0);
        assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
    }

    proptest! {
        #[test]
        fn always_in_unit_interval(v in -10.0f64..10.0) {
            let c = Confidence::new(v);
            prop_assert!((0.0..=1.0).contains(&c.value()));
        }
    }
}
