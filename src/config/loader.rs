//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tariff
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::repository::{InMemoryRateRepository, TariffTables};

use super::types::{
    AntiDumpingFile, EngineSettings, FtaRatesFile, GeneralRatesFile, GstProvisionsFile,
    TariffConfig, TcoFile,
};

/// Loads and provides access to tariff configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and builds the engine settings and rate tables from them.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/tariff/
/// ├── engine.yaml          # GST rate, GST threshold, TCO expiry warning window
/// ├── general_rates.yaml   # General (MFN) rates
/// ├── fta_rates.yaml       # FTA preferential rates
/// ├── anti_dumping.yaml    # Anti-dumping measures
/// ├── tco.yaml             # TCO exemption grants
/// └── gst_provisions.yaml  # GST exemption provisions
/// ```
///
/// # Example
///
/// ```no_run
/// use duty_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/tariff").unwrap();
/// println!("GST rate: {}", loader.settings().gst_rate);
/// println!("General rates: {}", loader.tables().general_rates.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TariffConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The engine settings are out of range
    ///
    /// # Example
    ///
    /// ```no_run
    /// use duty_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/tariff")?;
    /// # Ok::<(), duty_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let settings = Self::load_yaml::<EngineSettings>(&engine_path)?;
        settings.validate(&engine_path.display().to_string())?;

        let general = Self::load_yaml::<GeneralRatesFile>(&path.join("general_rates.yaml"))?;
        let fta = Self::load_yaml::<FtaRatesFile>(&path.join("fta_rates.yaml"))?;
        let anti_dumping = Self::load_yaml::<AntiDumpingFile>(&path.join("anti_dumping.yaml"))?;
        let tco = Self::load_yaml::<TcoFile>(&path.join("tco.yaml"))?;
        let gst = Self::load_yaml::<GstProvisionsFile>(&path.join("gst_provisions.yaml"))?;

        let tables = TariffTables {
            general_rates: general.general_rates,
            fta_rates: fta.fta_rates,
            anti_dumping_rates: anti_dumping.anti_dumping_rates,
            exemptions: tco.exemptions,
            gst_provisions: gst.gst_provisions,
        };

        info!(
            path = %path.display(),
            general_rates = tables.general_rates.len(),
            fta_rates = tables.fta_rates.len(),
            anti_dumping_rates = tables.anti_dumping_rates.len(),
            exemptions = tables.exemptions.len(),
            gst_provisions = tables.gst_provisions.len(),
            "Loaded tariff configuration"
        );

        Ok(Self {
            config: TariffConfig::new(settings, tables),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying tariff configuration.
    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Returns the rate tables.
    pub fn tables(&self) -> &TariffTables {
        self.config.tables()
    }

    /// Consumes the loader, returning the settings and an in-memory repository over the tables.
    pub fn into_repository(self) -> (EngineSettings, InMemoryRateRepository) {
        let (settings, tables) = self.config.into_parts();
        (settings, InMemoryRateRepository::new(tables))
    }
}
