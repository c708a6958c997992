//! Per-line IVA liquidation.
//!
//! The whole derivation chain is one explicit pipeline that returns a
//! fully populated, immutable [`LineItemResult`]. Each step reads only
//! fields computed by earlier steps, so the dependency order is enforced
//! by construction.

use crate::affectation::{CostType, TaxAffectation, TaxRate};
use crate::currency::mirror;
use crate::defaults::{default_true, hundred, one};
use crate::error::ComputeError;
use crate::rounding::{round_half_up, RoundingPolicy, MAX_DECIMAL_PLACES};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input line of a commercial document.
///
/// The exchange rate and decimal places normally come from the document
/// header; [`crate::Document::compute`] copies them onto every line before
/// the map phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    /// Optional item code, passed through for reporting
    #[serde(default)]
    pub item_code: Option<String>,
    /// Optional item name, passed through for reporting
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default = "one")]
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub unit_price: Decimal,
    /// Per-unit discount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub discount: Decimal,
    /// Per-unit share of a document-level discount
    #[serde(default)]
    #[schemars(with = "f64")]
    pub global_discount: Decimal,
    /// IVA rate in percent (0, 5 or 10)
    #[schemars(with = "u8")]
    pub tax_rate: TaxRate,
    pub affectation: TaxAffectation,
    /// Taxed share of a mixed line, percent
    #[serde(default = "hundred")]
    #[schemars(with = "f64")]
    pub gravada_proportion: Decimal,
    /// Imputa IVA: whether VAT on this line is creditable against the
    /// buyer's own liability
    #[serde(default = "default_true")]
    pub input_credit: bool,
    /// Creditable share under input-credit proration, percent
    #[serde(default = "hundred")]
    #[schemars(with = "f64")]
    pub input_credit_proportion: Decimal,
    /// Transaction-to-base exchange rate
    #[serde(default = "one")]
    #[schemars(with = "f64")]
    pub exchange_rate: Decimal,
    /// Transaction-currency decimal places
    #[serde(default)]
    pub decimal_places: u32,
    #[serde(default)]
    pub cost_type: CostType,
}

impl LineItem {
    /// All checks run before any derived field is produced; a rejected
    /// input never yields a partial result.
    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.quantity < Decimal::ZERO {
            return Err(ComputeError::NegativeQuantity(self.quantity));
        }
        check_proportion("gravada proportion", self.gravada_proportion)?;
        check_proportion("input-credit proportion", self.input_credit_proportion)?;
        if self.exchange_rate <= Decimal::ZERO {
            return Err(ComputeError::NonPositiveExchangeRate(self.exchange_rate));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ComputeError::DecimalPlacesOutOfRange(self.decimal_places));
        }
        Ok(())
    }
}

fn check_proportion(field: &'static str, value: Decimal) -> Result<(), ComputeError> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(ComputeError::ProportionOutOfRange { field, value });
    }
    Ok(())
}

/// Fully computed liquidation of one line. Immutable once built; any input
/// change requires recomputing the whole line.
///
/// Every monetary field has a base-currency mirror (`*_mb`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItemResult {
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[schemars(with = "u8")]
    pub tax_rate: TaxRate,
    pub affectation: TaxAffectation,
    pub input_credit: bool,
    pub cost_type: CostType,

    /// Price times quantity, before discounts
    #[schemars(with = "f64")]
    pub gross: Decimal,
    /// Gross minus per-unit and global discounts
    #[schemars(with = "f64")]
    pub net: Decimal,
    #[schemars(with = "f64")]
    pub net_mb: Decimal,
    /// Taxable base (base gravada)
    #[schemars(with = "f64")]
    pub taxable_base: Decimal,
    #[schemars(with = "f64")]
    pub taxable_base_mb: Decimal,
    /// VAT liability (liquidación IVA)
    #[schemars(with = "f64")]
    pub vat: Decimal,
    #[schemars(with = "f64")]
    pub vat_mb: Decimal,
    /// Exempt base; the full net amount for EXENTO/EXONERADO lines
    #[schemars(with = "f64")]
    pub exempt_base: Decimal,
    #[schemars(with = "f64")]
    pub exempt_base_mb: Decimal,
    /// Creditable share of the taxable base
    #[schemars(with = "f64")]
    pub credit_base: Decimal,
    #[schemars(with = "f64")]
    pub credit_base_mb: Decimal,
    /// Creditable share of the VAT liability
    #[schemars(with = "f64")]
    pub credit_vat: Decimal,
    #[schemars(with = "f64")]
    pub credit_vat_mb: Decimal,
    /// Non-creditable share: the prorated remainder of a taxed line, or the
    /// whole net amount when the credit flag is unset
    #[schemars(with = "f64")]
    pub non_creditable: Decimal,
    #[schemars(with = "f64")]
    pub non_creditable_mb: Decimal,
    /// Net cost with the credited VAT stripped out
    #[schemars(with = "f64")]
    pub net_excl_credited_vat: Decimal,
    #[schemars(with = "f64")]
    pub net_excl_credited_vat_mb: Decimal,
    /// Per-unit discount times quantity, at 8 places
    #[schemars(with = "f64")]
    pub discount_total: Decimal,
    /// Global discount share times quantity, at 8 places
    #[schemars(with = "f64")]
    pub global_discount_total: Decimal,
}

/// Proportional taxable base: `100 * net * p / (10000 + rate * p)`.
fn proportional_base(net: Decimal, rate: Decimal, proportion: Decimal) -> Decimal {
    dec!(100) * net * proportion / (dec!(10000) + rate * proportion)
}

/// Compute every derived field of a line, in fixed dependency order.
///
/// Pure and deterministic: identical inputs always produce an identical
/// result. Fails before producing anything if the input is invalid.
pub fn compute_line(line: &LineItem) -> Result<LineItemResult, ComputeError> {
    line.validate()?;
    let rounding = RoundingPolicy::new(line.decimal_places)?;
    let fx = line.exchange_rate;
    let rate = line.tax_rate.as_decimal();
    let rule = line.affectation.rule();

    let gross = rounding.round(line.unit_price * line.quantity);
    let net = rounding.round(
        gross - line.discount * line.quantity - line.global_discount * line.quantity,
    );
    let net_mb = mirror(net, fx, 0);

    // The raw quotient feeds the VAT liability and the credit base; only
    // the stored taxable_base is rounded. Rounding the base first can
    // shift the liability by a whole unit (net=115 at 10%: base stores
    // 105 but the VAT is round(10.4545) = 10, not 11).
    let raw_base = if !line.tax_rate.is_zero() && rule.proportional {
        proportional_base(net, rate, line.gravada_proportion)
    } else {
        Decimal::ZERO
    };
    let taxable_base = rounding.round(raw_base);
    // Historical quirk kept for parity with filed documents: the base
    // mirror rounds at the transaction precision, not at whole units like
    // the other mirrors.
    let taxable_base_mb = mirror(taxable_base, fx, line.decimal_places);

    let vat = rounding.round(raw_base * rate / dec!(100));
    let vat_mb = mirror(vat, fx, 0);

    // Canonical exempt-base rule: proportional split only for taxed
    // categories; exempt/exonerated lines take the full net amount.
    let exempt_base = if rule.proportional {
        rounding.round(
            dec!(100) * net * (dec!(100) - line.gravada_proportion)
                / (dec!(10000) + rate * line.gravada_proportion),
        )
    } else {
        net
    };
    let exempt_base_mb = mirror(exempt_base, fx, 0);

    // The credit base also scales the raw quotient; the credit VAT scales
    // the stored rounded liability.
    let (credit_base, credit_vat) = if line.input_credit {
        let share = line.input_credit_proportion / dec!(100);
        (
            rounding.round(raw_base * share),
            rounding.round(vat * share),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    let credit_base_mb = mirror(credit_base, fx, 0);
    let credit_vat_mb = mirror(credit_vat, fx, 0);

    let non_creditable = rounding.round(net - credit_base - credit_vat);
    let non_creditable_mb = mirror(non_creditable, fx, 0);

    let net_excl_credited_vat = rounding.round(net - credit_vat);
    let net_excl_credited_vat_mb = mirror(net_excl_credited_vat, fx, 0);

    let discount_total = round_half_up(line.discount * line.quantity, 8);
    let global_discount_total = round_half_up(line.global_discount * line.quantity, 8);

    log::debug!(
        "line {}: net={} base={} vat={} exempt={}",
        line.item_name.as_deref().unwrap_or("-"),
        net,
        taxable_base,
        vat,
        exempt_base
    );

    Ok(LineItemResult {
        item_code: line.item_code.clone(),
        item_name: line.item_name.clone(),
        tax_rate: line.tax_rate,
        affectation: line.affectation,
        input_credit: line.input_credit,
        cost_type: line.cost_type,
        gross,
        net,
        net_mb,
        taxable_base,
        taxable_base_mb,
        vat,
        vat_mb,
        exempt_base,
        exempt_base_mb,
        credit_base,
        credit_base_mb,
        credit_vat,
        credit_vat_mb,
        non_creditable,
        non_creditable_mb,
        net_excl_credited_vat,
        net_excl_credited_vat_mb,
        discount_total,
        global_discount_total,
    })
}
