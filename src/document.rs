//! Document-level aggregation: folds computed line results into IVA totals.
//!
//! The fold runs over a single accumulator so every bucket assignment is
//! in one place and independently testable.

use crate::affectation::{TaxAffectation, TaxRate};
use crate::currency::mirror;
use crate::defaults::{one, pyg};
use crate::error::ComputeError;
use crate::line::{compute_line, LineItem, LineItemResult};
use crate::rounding::{round_half_up, RoundingPolicy, MAX_DECIMAL_PLACES};
use crate::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Precision at which totals start risking dropped trailing digits in
/// 96-bit decimal arithmetic on large amounts.
const PRECISION_WARNING_PLACES: u32 = 6;

/// Document header: transaction currency and its relation to the base
/// currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentHeader {
    #[serde(default = "pyg")]
    pub currency: String,
    /// Transaction-currency decimal places
    #[serde(default)]
    pub decimal_places: u32,
    /// Transaction-to-base exchange rate
    #[serde(default = "one")]
    #[schemars(with = "f64")]
    pub exchange_rate: Decimal,
    #[serde(default)]
    pub document_date: Option<NaiveDate>,
}

impl DocumentHeader {
    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.exchange_rate <= Decimal::ZERO {
            return Err(ComputeError::NonPositiveExchangeRate(self.exchange_rate));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ComputeError::DecimalPlacesOutOfRange(self.decimal_places));
        }
        Ok(())
    }
}

/// A commercial document: header plus ordered line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    pub header: DocumentHeader,
    pub lines: Vec<LineItem>,
}

impl Document {
    /// Two-phase pipeline: every line passes through the calculator (map)
    /// with the header's exchange rate and precision, then the results are
    /// folded into totals (reduce). Aborts on the first invalid line; no
    /// partial aggregate is exposed.
    pub fn compute(&self) -> Result<(Vec<LineItemResult>, DocumentTotals), ComputeError> {
        self.header.validate()?;
        let mut results = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let mut line = line.clone();
            line.exchange_rate = self.header.exchange_rate;
            line.decimal_places = self.header.decimal_places;
            results.push(compute_line(&line)?);
        }
        let totals = compute_document(&self.header, &results)?;
        Ok((results, totals))
    }
}

/// Document totals, each amount in transaction currency with a
/// base-currency mirror (`*_mb`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentTotals {
    /// EXENTO nets plus GRAVADO_PARCIAL exempt bases
    #[schemars(with = "f64")]
    pub exempt_total: Decimal,
    #[schemars(with = "f64")]
    pub exempt_total_mb: Decimal,
    /// EXONERADO nets
    #[schemars(with = "f64")]
    pub exonerated_total: Decimal,
    #[schemars(with = "f64")]
    pub exonerated_total_mb: Decimal,
    #[schemars(with = "f64")]
    pub exempt_exonerated_subtotal: Decimal,
    #[schemars(with = "f64")]
    pub exempt_exonerated_subtotal_mb: Decimal,

    #[schemars(with = "f64")]
    pub taxable_base_5: Decimal,
    #[schemars(with = "f64")]
    pub taxable_base_5_mb: Decimal,
    #[schemars(with = "f64")]
    pub taxable_base_10: Decimal,
    #[schemars(with = "f64")]
    pub taxable_base_10_mb: Decimal,
    #[schemars(with = "f64")]
    pub vat_5: Decimal,
    #[schemars(with = "f64")]
    pub vat_5_mb: Decimal,
    #[schemars(with = "f64")]
    pub vat_10: Decimal,
    #[schemars(with = "f64")]
    pub vat_10_mb: Decimal,

    /// Informational gross subtotal at 5%: full net of fully taxed lines
    /// plus base+VAT of mixed lines
    #[schemars(with = "f64")]
    pub gross_subtotal_5: Decimal,
    #[schemars(with = "f64")]
    pub gross_subtotal_5_mb: Decimal,
    /// Informational gross subtotal at 10%
    #[schemars(with = "f64")]
    pub gross_subtotal_10: Decimal,
    #[schemars(with = "f64")]
    pub gross_subtotal_10_mb: Decimal,

    /// Sum of per-line item discounts, accumulated at 8 places
    #[schemars(with = "f64")]
    pub discount_items: Decimal,
    #[schemars(with = "f64")]
    pub discount_items_mb: Decimal,
    /// Sum of per-line global-discount shares, accumulated at 8 places
    #[schemars(with = "f64")]
    pub discount_global: Decimal,
    #[schemars(with = "f64")]
    pub discount_global_mb: Decimal,

    /// Net total of credit-flagged lines
    #[schemars(with = "f64")]
    pub credit_net_total: Decimal,
    #[schemars(with = "f64")]
    pub credit_net_total_mb: Decimal,
    #[schemars(with = "f64")]
    pub credit_base_total: Decimal,
    #[schemars(with = "f64")]
    pub credit_base_total_mb: Decimal,
    #[schemars(with = "f64")]
    pub credit_vat_total: Decimal,
    #[schemars(with = "f64")]
    pub credit_vat_total_mb: Decimal,
    #[schemars(with = "f64")]
    pub non_creditable_total: Decimal,
    #[schemars(with = "f64")]
    pub non_creditable_total_mb: Decimal,

    #[schemars(with = "f64")]
    pub grand_total: Decimal,
    #[schemars(with = "f64")]
    pub grand_total_mb: Decimal,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// Running totals during the fold, in transaction currency and unrounded.
#[derive(Debug, Default)]
struct Accumulator {
    exempt: Decimal,
    exonerated: Decimal,
    base_5: Decimal,
    base_10: Decimal,
    vat_5: Decimal,
    vat_10: Decimal,
    subtotal_5: Decimal,
    subtotal_10: Decimal,
    discount_items: Decimal,
    discount_global: Decimal,
    credit_net: Decimal,
    credit_base: Decimal,
    credit_vat: Decimal,
    non_creditable: Decimal,
    grand_total: Decimal,
    grand_total_mb: Decimal,
}

impl Accumulator {
    fn fold(&mut self, line: &LineItemResult) {
        match line.affectation {
            TaxAffectation::Exento => self.exempt += line.net,
            TaxAffectation::GravadoParcial => self.exempt += line.exempt_base,
            TaxAffectation::Exonerado => self.exonerated += line.net,
            TaxAffectation::Gravado => {}
        }

        let subtotal_share = match line.affectation {
            TaxAffectation::Gravado => line.net,
            TaxAffectation::GravadoParcial => line.taxable_base + line.vat,
            _ => Decimal::ZERO,
        };
        match line.tax_rate {
            TaxRate::Five => {
                self.base_5 += line.taxable_base;
                self.vat_5 += line.vat;
                self.subtotal_5 += subtotal_share;
            }
            TaxRate::Ten => {
                self.base_10 += line.taxable_base;
                self.vat_10 += line.vat;
                self.subtotal_10 += subtotal_share;
            }
            TaxRate::Zero => {}
        }

        if line.input_credit {
            self.credit_net += line.net;
            self.credit_base += line.credit_base;
            self.credit_vat += line.credit_vat;
            self.non_creditable += line.non_creditable;
        } else {
            self.non_creditable += line.net;
        }

        self.discount_items += line.discount_total;
        self.discount_global += line.global_discount_total;
        self.grand_total += line.net;
        self.grand_total_mb += line.net_mb;
    }

    /// Sum-then-round: rounding happens once per aggregate, here.
    fn finish(self, header: &DocumentHeader, rounding: RoundingPolicy) -> DocumentTotals {
        let fx = header.exchange_rate;
        let txn = |v: Decimal| rounding.round(v);
        let mb = |v: Decimal| mirror(v, fx, 0);

        let exempt_total = txn(self.exempt);
        let exonerated_total = txn(self.exonerated);
        let exempt_exonerated_subtotal = txn(self.exonerated + self.exempt);
        let taxable_base_5 = txn(self.base_5);
        let taxable_base_10 = txn(self.base_10);
        let vat_5 = txn(self.vat_5);
        let vat_10 = txn(self.vat_10);
        let gross_subtotal_5 = txn(self.subtotal_5);
        let gross_subtotal_10 = txn(self.subtotal_10);
        let discount_items = round_half_up(self.discount_items, 8);
        let discount_global = round_half_up(self.discount_global, 8);
        let credit_net_total = txn(self.credit_net);
        let credit_base_total = txn(self.credit_base);
        let credit_vat_total = txn(self.credit_vat);
        let non_creditable_total = txn(self.non_creditable);
        let grand_total = txn(self.grand_total);

        let mut warnings = Vec::new();
        if header.decimal_places >= PRECISION_WARNING_PLACES {
            warnings.push(Warning::PrecisionLoss {
                places: header.decimal_places,
            });
        }

        DocumentTotals {
            exempt_total,
            exempt_total_mb: mb(exempt_total),
            exonerated_total,
            exonerated_total_mb: mb(exonerated_total),
            exempt_exonerated_subtotal,
            exempt_exonerated_subtotal_mb: mb(exempt_exonerated_subtotal),
            taxable_base_5,
            taxable_base_5_mb: mb(taxable_base_5),
            taxable_base_10,
            taxable_base_10_mb: mb(taxable_base_10),
            vat_5,
            vat_5_mb: mb(vat_5),
            vat_10,
            vat_10_mb: mb(vat_10),
            gross_subtotal_5,
            gross_subtotal_5_mb: mb(gross_subtotal_5),
            gross_subtotal_10,
            gross_subtotal_10_mb: mb(gross_subtotal_10),
            discount_items,
            discount_items_mb: mb(discount_items),
            discount_global,
            discount_global_mb: mb(discount_global),
            credit_net_total,
            credit_net_total_mb: mb(credit_net_total),
            credit_base_total,
            credit_base_total_mb: mb(credit_base_total),
            credit_vat_total,
            credit_vat_total_mb: mb(credit_vat_total),
            non_creditable_total,
            non_creditable_total_mb: mb(non_creditable_total),
            grand_total,
            // accumulated from the per-line whole-unit mirrors
            grand_total_mb: self.grand_total_mb,
            warnings,
        }
    }
}

/// Fold an ordered sequence of line results into document totals.
pub fn compute_document(
    header: &DocumentHeader,
    lines: &[LineItemResult],
) -> Result<DocumentTotals, ComputeError> {
    header.validate()?;
    let rounding = RoundingPolicy::new(header.decimal_places)?;
    let mut acc = Accumulator::default();
    for line in lines {
        acc.fold(line);
    }
    log::debug!(
        "document {}: {} lines, total={}",
        header.currency,
        lines.len(),
        acc.grand_total
    );
    Ok(acc.finish(header, rounding))
}
