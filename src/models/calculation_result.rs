//! Calculation result models for the duty calculation engine.
//!
//! This module contains the [`CalculationResult`] returned by the engine and the
//! [`BreakdownReport`] display reshaping of it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DutyComponent, ValueBasis};

/// Which duty regime was selected as the one that counts toward the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestRateType {
    /// General (MFN) duty.
    #[default]
    General,
    /// FTA preferential duty.
    Fta,
    /// TCO exemption.
    TcoExemption,
}

impl fmt::Display for BestRateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BestRateType::General => "general",
            BestRateType::Fta => "fta",
            BestRateType::TcoExemption => "tco_exemption",
        };
        f.write_str(name)
    }
}

/// The complete result of a duty calculation.
///
/// Invariants: `duty_inclusive_value == customs_value + total_duty` and
/// `total_amount == duty_inclusive_value + total_gst`. Anti-dumping duty is
/// always added on top of the selected best-rate duty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The classification code calculated.
    pub classification_code: String,
    /// Origin country.
    pub country_code: String,
    /// Declared customs value.
    pub customs_value: Decimal,
    /// The date rates were evaluated on.
    pub calculation_date: NaiveDate,
    /// Basis the customs value was declared on.
    pub value_basis: ValueBasis,
    /// General duty, if a general rate resolved.
    pub general_duty: Option<DutyComponent>,
    /// FTA duty, if a preferential rate resolved.
    pub fta_duty: Option<DutyComponent>,
    /// Anti-dumping duty, if a measure applies.
    pub anti_dumping_duty: Option<DutyComponent>,
    /// TCO exemption, if one applies.
    pub tco_exemption: Option<DutyComponent>,
    /// GST on the duty-inclusive value.
    pub gst_component: DutyComponent,
    /// Selected duty plus anti-dumping duty.
    pub total_duty: Decimal,
    /// Customs value plus total duty.
    pub duty_inclusive_value: Decimal,
    /// GST payable.
    pub total_gst: Decimal,
    /// Duty-inclusive value plus GST.
    pub total_amount: Decimal,
    /// The regime that counts toward the total.
    pub best_rate_type: BestRateType,
    /// Duty avoided compared with the general rate.
    pub potential_savings: Decimal,
    /// Ordered explanation of each calculation step.
    pub steps: Vec<String>,
    /// Compliance requirements the importer must meet.
    pub compliance_notes: Vec<String>,
    /// Problems encountered that did not stop the calculation.
    pub warnings: Vec<String>,
}

impl CalculationResult {
    /// Returns the computed components in display order.
    pub fn components(&self) -> Vec<&DutyComponent> {
        [
            self.general_duty.as_ref(),
            self.fta_duty.as_ref(),
            self.tco_exemption.as_ref(),
            self.anti_dumping_duty.as_ref(),
            Some(&self.gst_component),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Formats a monetary amount for display, e.g. `$1320.00`.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// A calculation reshaped for display.
///
/// Built from a [`CalculationResult`] with no further computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownReport {
    /// The classification code calculated.
    pub classification_code: String,
    /// Origin country.
    pub country_code: String,
    /// The date rates were evaluated on.
    pub calculation_date: NaiveDate,
    /// Each component keyed by its kind.
    pub components: BTreeMap<String, Value>,
    /// Formatted totals keyed by name.
    pub totals: BTreeMap<String, String>,
    /// The regime that counts toward the total.
    pub best_rate_type: BestRateType,
    /// Formatted savings against the general rate.
    pub potential_savings: String,
    /// Ordered explanation of each calculation step.
    pub steps: Vec<String>,
    /// Compliance requirements the importer must meet.
    pub compliance_notes: Vec<String>,
    /// Problems encountered that did not stop the calculation.
    pub warnings: Vec<String>,
}

impl From<&CalculationResult> for BreakdownReport {
    fn from(result: &CalculationResult) -> Self {
        let components = result
            .components()
            .into_iter()
            .map(|component| {
                let entry = serde_json::json!({
                    "rate": component.rate.map(|r| r.normalize().to_string()),
                    "amount": format_money(component.amount),
                    "basis": component.basis,
                    "description": component.description,
                    "details": component.details,
                });
                (component.kind.clone(), entry)
            })
            .collect();

        let totals = [
            ("customs_value", result.customs_value),
            ("total_duty", result.total_duty),
            ("duty_inclusive_value", result.duty_inclusive_value),
            ("total_gst", result.total_gst),
            ("total_amount", result.total_amount),
        ]
        .into_iter()
        .map(|(name, amount)| (name.to_string(), format_money(amount)))
        .collect();

        BreakdownReport {
            classification_code: result.classification_code.clone(),
            country_code: result.country_code.clone(),
            calculation_date: result.calculation_date,
            components,
            totals,
            best_rate_type: result.best_rate_type,
            potential_savings: format_money(result.potential_savings),
            steps: result.steps.clone(),
            compliance_notes: result.compliance_notes.clone(),
            warnings: result.warnings.clone(),
        }
    }
}
