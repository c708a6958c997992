//! IVA affectation categories, tax rates and the formula-selection table.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// IVA rate in percent. Paraguayan VAT only knows 0, 5 and 10; any other
/// number is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaxRate {
    Zero,
    Five,
    Ten,
}

impl TaxRate {
    pub fn percent(self) -> u8 {
        match self {
            TaxRate::Zero => 0,
            TaxRate::Five => 5,
            TaxRate::Ten => 10,
        }
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.percent())
    }

    pub fn is_zero(self) -> bool {
        self == TaxRate::Zero
    }
}

impl TryFrom<u8> for TaxRate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaxRate::Zero),
            5 => Ok(TaxRate::Five),
            10 => Ok(TaxRate::Ten),
            other => Err(format!("tax rate must be 0, 5 or 10: {other}")),
        }
    }
}

impl From<TaxRate> for u8 {
    fn from(rate: TaxRate) -> u8 {
        rate.percent()
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Afectación IVA: which liquidation formulas apply to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TaxAffectation {
    /// Fully taxed.
    #[default]
    Gravado,
    /// Mixed taxed/exempt line, split by the gravada proportion.
    GravadoParcial,
    /// Exempt from VAT.
    Exento,
    /// Exonerated by a specific legal disposition.
    Exonerado,
}

/// Bucket a line's net amount lands in for document totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Taxed,
    Exempt,
    Exonerated,
}

/// Formula selection for one affectation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffectationRule {
    /// Apply the proportional taxable-base / exempt-base formulas.
    pub proportional: bool,
    pub bucket: Bucket,
}

impl TaxAffectation {
    /// Table-driven mapping from category to applicable formulas.
    /// EXENTO and EXONERADO bypass the proportional formulas and route the
    /// full net amount to their bucket.
    pub fn rule(self) -> AffectationRule {
        match self {
            TaxAffectation::Gravado => AffectationRule {
                proportional: true,
                bucket: Bucket::Taxed,
            },
            TaxAffectation::GravadoParcial => AffectationRule {
                proportional: true,
                bucket: Bucket::Taxed,
            },
            TaxAffectation::Exento => AffectationRule {
                proportional: false,
                bucket: Bucket::Exempt,
            },
            TaxAffectation::Exonerado => AffectationRule {
                proportional: false,
                bucket: Bucket::Exonerated,
            },
        }
    }

    pub fn is_taxed(self) -> bool {
        self.rule().bucket == Bucket::Taxed
    }

    pub fn display(&self) -> &'static str {
        match self {
            TaxAffectation::Gravado => "Gravado",
            TaxAffectation::GravadoParcial => "Gravado Parcial",
            TaxAffectation::Exento => "Exento",
            TaxAffectation::Exonerado => "Exonerado",
        }
    }
}

impl std::fmt::Display for TaxAffectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Cost classification carried through to downstream costing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum CostType {
    #[default]
    Direct,
    Indirect,
}
