//! Base-currency ("moneda base") mirroring.

use crate::rounding::round_half_up;
use rust_decimal::Decimal;

/// Mirror an amount into the base currency at the given exchange rate.
/// Pure and stateless: `round(amount * rate, places)`.
pub fn mirror(amount: Decimal, exchange_rate: Decimal, places: u32) -> Decimal {
    round_half_up(amount * exchange_rate, places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mirrors_at_whole_units() {
        assert_eq!(mirror(dec!(100), dec!(7300), 0), dec!(730000));
        assert_eq!(mirror(dec!(90.91), dec!(7300), 0), dec!(663643));
    }

    #[test]
    fn mirrors_at_configured_precision() {
        assert_eq!(mirror(dec!(10.505), dec!(1), 2), dec!(10.51));
    }

    #[test]
    fn round_trip_within_one_unit() {
        let rate = dec!(7300);
        let amount = dec!(123.45);
        let there = mirror(amount, rate, 2);
        let back = mirror(there, Decimal::ONE / rate, 2);
        assert!((back - amount).abs() <= dec!(0.01));
    }
}
