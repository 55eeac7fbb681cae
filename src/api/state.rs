//! Application state for the duty calculation API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, EngineSettings};
use crate::engine::DutyEngine;
use crate::repository::RateRepository;

/// The engine type served over HTTP, over any repository implementation.
pub type SharedEngine = DutyEngine<Arc<dyn RateRepository>>;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the duty engine and its rate repository.
#[derive(Clone)]
pub struct AppState {
    /// The duty engine.
    engine: Arc<SharedEngine>,
}

impl AppState {
    /// Creates a new application state over a repository and settings.
    pub fn new(repository: Arc<dyn RateRepository>, settings: EngineSettings) -> Self {
        Self {
            engine: Arc::new(DutyEngine::with_settings(repository, settings)),
        }
    }

    /// Creates application state from a loaded tariff configuration.
    pub fn from_config(config: ConfigLoader) -> Self {
        let (settings, repository) = config.into_repository();
        Self::new(Arc::new(repository), settings)
    }

    /// Returns a reference to the duty engine.
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }
}
