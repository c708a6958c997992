//! Round-half-up decimal rounding, shared by the line calculator and the
//! document aggregator.

use crate::error::ComputeError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upper bound on supported decimal places.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Rounding policy: half-up to a fixed number of decimal places.
///
/// `Decimal::round_dp` is banker's rounding and would turn 0.125 into 0.12;
/// fiscal reporting requires 0.13, so the scaling is done by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy {
    places: u32,
}

impl RoundingPolicy {
    /// Rejects `places` outside [0, 8]; out-of-range values are never
    /// silently clamped.
    pub fn new(places: u32) -> Result<Self, ComputeError> {
        if places > MAX_DECIMAL_PLACES {
            return Err(ComputeError::DecimalPlacesOutOfRange(places));
        }
        Ok(RoundingPolicy { places })
    }

    pub fn places(&self) -> u32 {
        self.places
    }

    pub fn round(&self, value: Decimal) -> Decimal {
        round_half_up(value, self.places)
    }
}

/// Round half-up to `places` decimal places.
///
/// Scales by 10^places, truncates toward zero, and increments away from
/// zero when the fractional remainder is >= 0.5. The remainder of a
/// negative value is negative, so negative amounts (credit-note lines)
/// truncate toward zero.
pub fn round_half_up(value: Decimal, places: u32) -> Decimal {
    debug_assert!(places <= MAX_DECIMAL_PLACES);
    let factor = Decimal::from(10u64.pow(places));
    let scaled = value * factor;
    let mut integral = scaled.trunc();
    if scaled - integral >= dec!(0.5) {
        integral += Decimal::ONE;
    }
    integral / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_rounds_up_not_to_even() {
        assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
        assert_eq!(round_half_up(dec!(2.5), 0), dec!(3));
        assert_eq!(round_half_up(dec!(0.5), 0), dec!(1));
    }

    #[test]
    fn below_half_truncates() {
        assert_eq!(round_half_up(dec!(0.124), 2), dec!(0.12));
        assert_eq!(round_half_up(dec!(2.4999), 0), dec!(2));
    }

    #[test]
    fn exact_values_unchanged() {
        assert_eq!(round_half_up(dec!(91), 0), dec!(91));
        assert_eq!(round_half_up(dec!(10.25), 2), dec!(10.25));
    }

    #[test]
    fn no_binary_float_artifacts() {
        // 1.005 is not representable in binary; a float implementation
        // rounds it down.
        assert_eq!(round_half_up(dec!(1.005), 2), dec!(1.01));
    }

    #[test]
    fn negative_values_truncate_toward_zero() {
        assert_eq!(round_half_up(dec!(-0.6), 0), dec!(0));
        assert_eq!(round_half_up(dec!(-1.6), 0), dec!(-1));
        assert_eq!(round_half_up(dec!(-1.25), 1), dec!(-1.2));
    }

    #[test]
    fn eight_places_supported() {
        assert_eq!(
            round_half_up(dec!(0.123456785), 8),
            dec!(0.12345679)
        );
    }

    #[test]
    fn policy_rejects_out_of_range_places() {
        assert_eq!(
            RoundingPolicy::new(9).unwrap_err(),
            ComputeError::DecimalPlacesOutOfRange(9)
        );
        assert!(RoundingPolicy::new(8).is_ok());
        assert!(RoundingPolicy::new(0).is_ok());
    }

    #[test]
    fn policy_rounds_at_configured_places() {
        let policy = RoundingPolicy::new(2).unwrap();
        assert_eq!(policy.round(dec!(90.909090)), dec!(90.91));
        assert_eq!(policy.places(), 2);
    }
}
