//! Request types for the duty calculation API.
//!
//! This module defines the JSON request structure shared by the `/calculate`
//! and `/explain` endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CalculationInput, ValueBasis};

/// Request body for the `/calculate` and `/explain` endpoints.
///
/// Codes are trimmed and the country code upper-cased before reaching the
/// engine; any other malformation is reported by engine validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Tariff classification code, e.g. "2204210000".
    pub classification_code: String,
    /// ISO 3166-1 alpha-3 origin country, e.g. "NZL".
    pub country_code: String,
    /// Customs value in AUD.
    pub customs_value: Decimal,
    /// Quantity in the tariff unit, needed for specific rates.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Date rates are evaluated on; defaults to today.
    #[serde(default)]
    pub calculation_date: Option<NaiveDate>,
    /// Exporter name, for exporter-specific anti-dumping measures.
    #[serde(default)]
    pub exporter_name: Option<String>,
    /// Incoterm basis of the customs value.
    #[serde(default)]
    pub value_basis: ValueBasis,
}

impl From<CalculationRequest> for CalculationInput {
    fn from(req: CalculationRequest) -> Self {
        CalculationInput {
            classification_code: req.classification_code.trim().to_string(),
            country_code: req.country_code.trim().to_ascii_uppercase(),
            customs_value: req.customs_value,
            quantity: req.quantity,
            calculation_date: req.calculation_date,
            exporter_name: req
                .exporter_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            value_basis: req.value_basis,
        }
    }
}
