//! Shared serde default values.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub(crate) fn one() -> Decimal {
    Decimal::ONE
}

pub(crate) fn hundred() -> Decimal {
    dec!(100)
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn pyg() -> String {
    "PYG".to_string()
}
