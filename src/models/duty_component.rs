//! Duty component model.
//!
//! A [`DutyComponent`] is one contribution to the amount owed on an entry:
//! general duty, FTA duty, anti-dumping duty, a TCO exemption, or GST.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label for the general (MFN) duty component.
pub const GENERAL_DUTY: &str = "General Duty";
/// Label for the FTA preferential duty component.
pub const FTA_DUTY: &str = "FTA Duty";
/// Label for the anti-dumping duty component.
pub const ANTI_DUMPING_DUTY: &str = "Anti-dumping Duty";
/// Label for the TCO exemption component.
pub const TCO_EXEMPTION: &str = "TCO Exemption";
/// Label for the GST component.
pub const GST: &str = "GST";

/// How a component amount was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyBasis {
    /// Percentage of value.
    AdValorem,
    /// Amount per unit.
    Specific,
    /// Percentage plus per-unit amount.
    Compound,
    /// No duty payable.
    Free,
    /// Waived by an exemption.
    Exemption,
    /// Below a minimum value threshold.
    Threshold,
    /// Standard GST rate.
    StandardRate,
}

/// A single computed contribution to the amount owed.
///
/// # Example
///
/// ```
/// use duty_engine::models::{DutyBasis, DutyComponent, GENERAL_DUTY};
/// use rust_decimal::Decimal;
///
/// let free = DutyComponent::free(GENERAL_DUTY);
/// assert_eq!(free.amount, Decimal::ZERO);
/// assert_eq!(free.basis, DutyBasis::Free);
/// assert_eq!(free.description, "Free");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyComponent {
    /// What the component is (e.g. "General Duty").
    pub kind: String,
    /// Percentage applied, if rate-based.
    pub rate: Option<Decimal>,
    /// Monetary amount, rounded to the cent.
    pub amount: Decimal,
    /// How the amount was arrived at.
    pub basis: DutyBasis,
    /// Human-readable description of the rate.
    pub description: String,
    /// Free-form explanation data.
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl DutyComponent {
    /// Creates a component with empty details.
    pub fn new(
        kind: impl Into<String>,
        rate: Option<Decimal>,
        amount: Decimal,
        basis: DutyBasis,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            rate,
            amount,
            basis,
            description: description.into(),
            details: Map::new(),
        }
    }

    /// A zero-amount component with basis `Free`.
    pub fn free(kind: impl Into<String>) -> Self {
        Self::new(kind, None, Decimal::new(0, 2), DutyBasis::Free, "Free")
    }

    /// Adds a detail entry.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}
