//! Calculation input model.
//!
//! This module defines [`CalculationInput`], the normalized request the engine
//! calculates duty for, and the informational [`ValueBasis`] enum.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest customs value accepted, in whole currency units.
///
/// Keeps every duty and GST product well inside `Decimal`'s range.
pub const MAX_CUSTOMS_VALUE: i64 = 1_000_000_000_000_000;

/// Largest quantity accepted for per-unit rates.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// The Incoterm basis the customs value was declared on.
///
/// Informational only; it does not change any arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueBasis {
    /// Free on board.
    #[default]
    Fob,
    /// Cost, insurance and freight.
    Cif,
    /// Cost and freight.
    Cfr,
    /// Ex works.
    Exw,
    /// Delivered duty paid.
    Ddp,
    /// Delivered duty unpaid.
    Ddu,
}

/// A customs entry line to calculate duty and GST for.
///
/// # Example
///
/// ```
/// use duty_engine::models::CalculationInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let input = CalculationInput::new("2204210000", "NZL", Decimal::from_str("1200.00").unwrap());
/// assert!(input.validate().is_ok());
/// assert!(input.quantity.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// The HS classification code to calculate duty for.
    pub classification_code: String,
    /// Origin country, ISO 3166-1 alpha-3.
    pub country_code: String,
    /// Customs value in the base currency.
    pub customs_value: Decimal,
    /// Quantity, needed only for specific (per-unit) rates.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// The date rates are evaluated on. `None` means today.
    #[serde(default)]
    pub calculation_date: Option<NaiveDate>,
    /// Exporter name, used to find exporter-specific anti-dumping duties.
    #[serde(default)]
    pub exporter_name: Option<String>,
    /// Basis the customs value was declared on.
    #[serde(default)]
    pub value_basis: ValueBasis,
}

impl CalculationInput {
    /// Creates an input with no quantity, exporter or explicit date.
    pub fn new(
        classification_code: impl Into<String>,
        country_code: impl Into<String>,
        customs_value: Decimal,
    ) -> Self {
        Self {
            classification_code: classification_code.into(),
            country_code: country_code.into(),
            customs_value,
            quantity: None,
            calculation_date: None,
            exporter_name: None,
            value_basis: ValueBasis::default(),
        }
    }

    /// Sets the quantity used by per-unit rates.
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the date rates are evaluated on.
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.calculation_date = Some(date);
        self
    }

    /// Sets the exporter name.
    pub fn with_exporter(mut self, exporter_name: impl Into<String>) -> Self {
        self.exporter_name = Some(exporter_name.into());
        self
    }

    /// Returns the calculation date, falling back to today's local date.
    pub fn effective_date(&self) -> NaiveDate {
        self.calculation_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Checks the input invariants.
    ///
    /// Returns `EngineError::Validation` naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        let code = &self.classification_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(EngineError::validation(
                "classification_code",
                format!("'{}' is not a numeric classification code", code),
            ));
        }

        let country = &self.country_code;
        if country.len() != 3 || !country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(EngineError::validation(
                "country_code",
                format!("'{}' is not an ISO 3166-1 alpha-3 code", country),
            ));
        }

        if self.customs_value < Decimal::ZERO {
            return Err(EngineError::validation(
                "customs_value",
                format!("must not be negative (got {})", self.customs_value),
            ));
        }
        if self.customs_value > Decimal::from(MAX_CUSTOMS_VALUE) {
            return Err(EngineError::validation(
                "customs_value",
                format!("must not exceed {} (got {})", MAX_CUSTOMS_VALUE, self.customs_value),
            ));
        }

        if let Some(quantity) = self.quantity {
            if quantity <= Decimal::ZERO {
                return Err(EngineError::validation(
                    "quantity",
                    format!("must be greater than zero (got {})", quantity),
                ));
            }
            if quantity > Decimal::from(MAX_QUANTITY) {
                return Err(EngineError::validation(
                    "quantity",
                    format!("must not exceed {} (got {})", MAX_QUANTITY, quantity),
                ));
            }
        }

        Ok(())
    }
}
