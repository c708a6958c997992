use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Non-fatal advisories emitted alongside computed document totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// The configured precision is high enough that 96-bit decimal
    /// arithmetic can shed trailing digits on large amounts.
    PrecisionLoss { places: u32 },
}
