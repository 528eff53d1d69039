//! Duration to billable-quantity conversion.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use caseload_domain::BillingMethod;

use crate::error::EngineError;

/// Time-based services bill in fixed 15-minute increments.
pub const MINUTES_PER_UNIT: Decimal = dec!(15);

/// Converts a duration into a billable quantity.
///
/// Time-based: `floor(duration / 15)` — truncation, never rounding, so a
/// 14.9-minute visit yields zero units (but still counts as client time).
/// Per-encounter: always one unit.
///
/// The validator guarantees non-negative durations; a negative value here
/// is an upstream contract violation.
pub fn billable_units(duration_min: Decimal, method: BillingMethod) -> Result<u32, EngineError> {
    if duration_min < Decimal::ZERO {
        return Err(EngineError::InvalidDuration(duration_min));
    }
    match method {
        BillingMethod::PerEncounter => Ok(1),
        BillingMethod::TimeBased => {
            let units = (duration_min / MINUTES_PER_UNIT).floor();
            units
                .to_u32()
                .ok_or(EngineError::InvalidDuration(duration_min))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_based_units_floor_at_15_minute_boundaries() {
        let cases = [
            (dec!(0), 0u32),
            (dec!(14.9), 0),
            (dec!(15), 1),
            (dec!(29.99), 1),
            (dec!(44), 2),
            (dec!(60), 4),
        ];
        for (duration, expected) in cases {
            assert_eq!(
                billable_units(duration, BillingMethod::TimeBased).unwrap(),
                expected,
                "duration {duration}"
            );
        }
    }

    #[test]
    fn per_encounter_is_one_unit_regardless_of_duration() {
        assert_eq!(
            billable_units(dec!(0), BillingMethod::PerEncounter).unwrap(),
            1
        );
        assert_eq!(
            billable_units(dec!(240), BillingMethod::PerEncounter).unwrap(),
            1
        );
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert_eq!(
            billable_units(dec!(-1), BillingMethod::TimeBased),
            Err(EngineError::InvalidDuration(dec!(-1)))
        );
        assert_eq!(
            billable_units(dec!(-1), BillingMethod::PerEncounter),
            Err(EngineError::InvalidDuration(dec!(-1)))
        );
    }
}
