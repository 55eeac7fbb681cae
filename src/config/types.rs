//! Configuration types for duty calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DEFAULT_TCO_EXPIRY_WARNING_DAYS, default_gst_rate, default_gst_threshold};
use crate::error::{EngineError, EngineResult};
use crate::models::{AntiDumpingRate, ExemptionGrant, GeneralRate, GstProvision, PreferentialRate};
use crate::repository::TariffTables;

/// Engine-wide settings read from `engine.yaml`.
///
/// Every field is optional in YAML; a missing field takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// GST rate as a fraction (0.10 is 10%).
    #[serde(default = "default_gst_rate")]
    pub gst_rate: Decimal,
    /// Duty-inclusive value below which no GST is charged.
    #[serde(default = "default_gst_threshold")]
    pub gst_threshold: Decimal,
    /// TCO grants expiring within this many days raise a warning.
    #[serde(default = "default_tco_expiry_warning_days")]
    pub tco_expiry_warning_days: i64,
}

fn default_tco_expiry_warning_days() -> i64 {
    DEFAULT_TCO_EXPIRY_WARNING_DAYS
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            gst_rate: default_gst_rate(),
            gst_threshold: default_gst_threshold(),
            tco_expiry_warning_days: DEFAULT_TCO_EXPIRY_WARNING_DAYS,
        }
    }
}

impl EngineSettings {
    /// Checks the settings are usable, reporting problems against `path`.
    pub fn validate(&self, path: &str) -> EngineResult<()> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.to_string(),
            message,
        };

        if self.gst_rate < Decimal::ZERO || self.gst_rate > Decimal::ONE {
            return Err(invalid(format!(
                "gst_rate must be between 0 and 1, got {}",
                self.gst_rate
            )));
        }
        if self.gst_threshold < Decimal::ZERO {
            return Err(invalid(format!(
                "gst_threshold must not be negative, got {}",
                self.gst_threshold
            )));
        }
        if self.tco_expiry_warning_days < 0 {
            return Err(invalid(format!(
                "tco_expiry_warning_days must not be negative, got {}",
                self.tco_expiry_warning_days
            )));
        }

        Ok(())
    }
}

/// `general_rates.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralRatesFile {
    /// General rates by code.
    #[serde(default)]
    pub general_rates: Vec<GeneralRate>,
}

/// `fta_rates.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct FtaRatesFile {
    /// Preferential rates.
    #[serde(default)]
    pub fta_rates: Vec<PreferentialRate>,
}

/// `anti_dumping.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AntiDumpingFile {
    /// Anti-dumping measures.
    #[serde(default)]
    pub anti_dumping_rates: Vec<AntiDumpingRate>,
}

/// `tco.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TcoFile {
    /// TCO exemption grants.
    #[serde(default)]
    pub exemptions: Vec<ExemptionGrant>,
}

/// `gst_provisions.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct GstProvisionsFile {
    /// GST provisions.
    #[serde(default)]
    pub gst_provisions: Vec<GstProvision>,
}

/// Complete tariff configuration: engine settings plus rate tables.
#[derive(Debug, Clone, Default)]
pub struct TariffConfig {
    settings: EngineSettings,
    tables: TariffTables,
}

impl TariffConfig {
    /// Creates a configuration from its parts.
    pub fn new(settings: EngineSettings, tables: TariffTables) -> Self {
        Self { settings, tables }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the rate tables.
    pub fn tables(&self) -> &TariffTables {
        &self.tables
    }

    /// Splits the configuration into settings and tables.
    pub fn into_parts(self) -> (EngineSettings, TariffTables) {
        (self.settings, self.tables)
    }
}
