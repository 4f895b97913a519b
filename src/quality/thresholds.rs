//! Drinking-water threshold table (WHO/EPA guideline values).
//!
//! Every parameter has a closed safe interval. The classifier only consults
//! the pH interval in full; the other eight are checked against their upper
//! bound alone.
//!
//! Units conventions:
//! - TDS in ppm, turbidity in NTU, conductivity in µS/cm
//! - Hardness, chlorine, nitrates, fluoride and iron in mg/L
//! - pH is dimensionless

use crate::models::Parameter;
use serde::Serialize;

/// Closed interval `[min, max]` of acceptable readings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SafeRange {
    pub min: f64,
    pub max: f64,
}

impl SafeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Strictly above the upper bound; a reading equal to `max` is acceptable.
    pub fn exceeds(&self, value: f64) -> bool {
        value > self.max
    }
}

pub const PH_RANGE: SafeRange = SafeRange::new(6.5, 8.5);
pub const TDS_RANGE: SafeRange = SafeRange::new(0.0, 500.0);
pub const TURBIDITY_RANGE: SafeRange = SafeRange::new(0.0, 5.0);
pub const HARDNESS_RANGE: SafeRange = SafeRange::new(0.0, 150.0);
pub const CHLORINE_RANGE: SafeRange = SafeRange::new(0.0, 4.0);
pub const CONDUCTIVITY_RANGE: SafeRange = SafeRange::new(0.0, 500.0);
pub const NITRATES_RANGE: SafeRange = SafeRange::new(0.0, 10.0);
pub const FLUORIDE_RANGE: SafeRange = SafeRange::new(0.0, 1.5);
pub const IRON_RANGE: SafeRange = SafeRange::new(0.0, 0.3);

/// The full table, in `Parameter::ALL` order.
pub const SAFE_LIMITS: [(Parameter, SafeRange); 9] = [
    (Parameter::Ph, PH_RANGE),
    (Parameter::Tds, TDS_RANGE),
    (Parameter::Turbidity, TURBIDITY_RANGE),
    (Parameter::Hardness, HARDNESS_RANGE),
    (Parameter::Chlorine, CHLORINE_RANGE),
    (Parameter::Conductivity, CONDUCTIVITY_RANGE),
    (Parameter::Nitrates, NITRATES_RANGE),
    (Parameter::Fluoride, FLUORIDE_RANGE),
    (Parameter::Iron, IRON_RANGE),
];

/// Safe interval for one parameter.
pub const fn safe_range(parameter: Parameter) -> SafeRange {
    match parameter {
        Parameter::Ph => PH_RANGE,
        Parameter::Tds => TDS_RANGE,
        Parameter::Turbidity => TURBIDITY_RANGE,
        Parameter::Hardness => HARDNESS_RANGE,
        Parameter::Chlorine => CHLORINE_RANGE,
        Parameter::Conductivity => CONDUCTIVITY_RANGE,
        Parameter::Nitrates => NITRATES_RANGE,
        Parameter::Fluoride => FLUORIDE_RANGE,
        Parameter::Iron => IRON_RANGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_follows_canonical_parameter_order() {
        let order: Vec<Parameter> = SAFE_LIMITS.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, Parameter::ALL.to_vec());
        for (p, range) in SAFE_LIMITS {
            assert_eq!(safe_range(p), range);
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(PH_RANGE.contains(6.5));
        assert!(PH_RANGE.contains(8.5));
        assert!(!PH_RANGE.contains(6.499));
        assert!(!CHLORINE_RANGE.exceeds(4.0));
        assert!(CHLORINE_RANGE.exceeds(4.0001));
    }

    #[test]
    fn exceeds_ignores_lower_bound() {
        assert!(!IRON_RANGE.exceeds(-1.0));
        assert!(!IRON_RANGE.contains(-1.0));
    }
}
