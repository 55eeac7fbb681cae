//! Rate records read from a rate repository.
//!
//! Every record keys off a classification code that may be shorter than the
//! code being calculated. Records are read-only snapshots for the duration of
//! one calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// How a general duty rate is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// Percentage of customs value.
    AdValorem,
    /// Fixed amount per unit of quantity.
    Specific,
    /// Percentage of customs value plus an amount per unit.
    Compound,
    /// No duty.
    Free,
}

/// The general (MFN) duty rate for a classification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralRate {
    /// The classification code the rate is published against.
    pub code: String,
    /// Ad valorem percentage, e.g. `5` for 5%.
    #[serde(default)]
    pub percentage_rate: Option<Decimal>,
    /// Amount per unit for specific and compound rates.
    #[serde(default)]
    pub unit_amount: Option<Decimal>,
    /// Unit the per-unit amount is expressed in (e.g. "kg").
    #[serde(default)]
    pub unit: Option<String>,
    /// How the rate is expressed.
    pub kind: RateKind,
}

/// A free trade agreement preferential rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferentialRate {
    /// The classification code the rate is published against.
    pub code: String,
    /// Trade agreement identifier (e.g. "AANZFTA").
    pub agreement_id: String,
    /// Origin country the preference applies to.
    pub country_code: String,
    /// Preferential percentage rate.
    #[serde(default)]
    pub percentage_rate: Option<Decimal>,
    /// Tariff elimination staging category.
    #[serde(default)]
    pub staging_category: Option<String>,
    /// Date from which the preferential rate is eliminated to zero.
    #[serde(default)]
    pub elimination_date: Option<NaiveDate>,
    /// Date from which the rate applies.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    /// Quota quantity, if the preference is quota-limited.
    #[serde(default)]
    pub quota_quantity: Option<Decimal>,
    /// Rule of origin the goods must satisfy.
    #[serde(default)]
    pub origin_rule: Option<String>,
}

impl PreferentialRate {
    /// Returns true if the rate has taken effect on `date`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.effective_date.is_none_or(|effective| effective <= date)
    }

    /// Returns true if the tariff has been eliminated on `date`.
    pub fn is_eliminated_on(&self, date: NaiveDate) -> bool {
        self.elimination_date
            .is_some_and(|elimination| elimination <= date)
    }

    /// The rate payable on `date`: zero once eliminated, otherwise the stated rate.
    pub fn effective_rate(&self, date: NaiveDate) -> Decimal {
        if self.is_eliminated_on(date) {
            Decimal::ZERO
        } else {
            self.percentage_rate.unwrap_or(Decimal::ZERO)
        }
    }
}

/// An anti-dumping or countervailing duty measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiDumpingRate {
    /// The exact classification code the measure is gazetted against.
    pub code: String,
    /// Origin country subject to the measure.
    pub country_code: String,
    /// Exporter the measure is specific to; `None` for a country-wide measure.
    #[serde(default)]
    pub exporter_name: Option<String>,
    /// Ad valorem percentage.
    #[serde(default)]
    pub percentage_rate: Option<Decimal>,
    /// Amount per unit of quantity.
    #[serde(default)]
    pub per_unit_amount: Option<Decimal>,
    /// Unit the per-unit amount is expressed in.
    #[serde(default)]
    pub unit: Option<String>,
    /// Date from which the measure applies.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    /// Date from which the measure no longer applies.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Whether the measure is in force.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl AntiDumpingRate {
    /// Returns true if the measure is active and in force on `date`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.is_active
            && self.effective_date.is_none_or(|effective| effective <= date)
            && self.expiry_date.is_none_or(|expiry| expiry > date)
    }

    /// Returns true if this is an exporter-specific measure.
    pub fn is_exporter_specific(&self) -> bool {
        self.exporter_name.is_some()
    }
}

/// A tariff concession order (TCO) exempting goods from duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionGrant {
    /// The TCO number.
    pub number: String,
    /// The exact classification code the grant applies to.
    pub code: String,
    /// Date from which the grant applies.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    /// Date from which the grant no longer applies.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Whether the grant is current.
    #[serde(default = "default_true")]
    pub is_current: bool,
    /// Description of goods the grant covers.
    pub description: String,
}

impl ExemptionGrant {
    /// Returns true if the grant is current and `date` falls in `[effective, expiry)`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.is_current
            && self.effective_date.is_none_or(|effective| effective <= date)
            && self.expiry_date.is_none_or(|expiry| date < expiry)
    }
}

/// A GST provision, either code-specific or general (no code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstProvision {
    /// Classification code; `None` applies to everything.
    #[serde(default)]
    pub code: Option<String>,
    /// Exemption type granted by the provision, if any.
    #[serde(default)]
    pub exemption_type: Option<String>,
    /// Minimum value the provision applies from.
    #[serde(default)]
    pub value_threshold: Option<Decimal>,
    /// Whether the provision is in force.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl GstProvision {
    /// Returns true if the provision applies to a duty-inclusive value.
    pub fn applies_to_value(&self, value: Decimal) -> bool {
        self.value_threshold
            .is_none_or(|threshold| value >= threshold)
    }

    /// Returns true if the provision applies to `code` (or to every code).
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.as_deref().is_none_or(|own| own == code)
    }
}
