//! Paraguayan IVA document tax computation engine.
//!
//! Pure, synchronous derivation of per-line tax liquidations and
//! document-level totals: taxable bases, VAT liabilities, exempt and
//! exonerated buckets, input-credit proration and dual-currency mirrors.
//! The engine performs no I/O; callers feed it fully populated documents
//! and consume the computed results.

pub mod affectation;
pub mod currency;
mod defaults;
pub mod document;
pub mod error;
pub mod line;
pub mod rounding;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use affectation::{AffectationRule, Bucket, CostType, TaxAffectation, TaxRate};
pub use currency::mirror;
pub use document::{compute_document, Document, DocumentHeader, DocumentTotals};
pub use error::ComputeError;
pub use line::{compute_line, LineItem, LineItemResult};
pub use rounding::{round_half_up, RoundingPolicy};
pub use warnings::Warning;
