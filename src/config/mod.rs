//! Configuration loading and management for the duty calculation engine.
//!
//! This module provides functionality to load tariff configurations from YAML
//! files: engine settings and the general, FTA, anti-dumping, TCO and GST
//! rate tables.
//!
//! # Example
//!
//! ```no_run
//! use duty_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/tariff").unwrap();
//! println!("GST threshold: {}", config.settings().gst_threshold);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AntiDumpingFile, EngineSettings, FtaRatesFile, GeneralRatesFile, GstProvisionsFile,
    TariffConfig, TcoFile,
};
