use rust_decimal::Decimal;

/// Input validation errors. Every check runs before any derived field is
/// produced; a rejected input never yields a partial result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComputeError {
    #[error("negative quantity: {0}")]
    NegativeQuantity(Decimal),
    #[error("{field} must be between 0 and 100: {value}")]
    ProportionOutOfRange { field: &'static str, value: Decimal },
    #[error("exchange rate must be positive: {0}")]
    NonPositiveExchangeRate(Decimal),
    #[error("decimal places must be between 0 and 8: {0}")]
    DecimalPlacesOutOfRange(u32),
}
