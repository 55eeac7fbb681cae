//! Error types for the duty calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Two families exist: [`EngineError`] aborts a calculation and reaches the
//! caller, while [`LookupFailure`] is returned by rate repositories and is
//! downgraded by the engine to "no applicable rate" for every category except GST.

use thiserror::Error;

/// The main error type for the duty calculation engine.
///
/// # Example
///
/// ```
/// use duty_engine::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "customs_value".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input field 'customs_value': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller-supplied input violates an invariant.
    #[error("Invalid input field '{field}': {message}")]
    Validation {
        /// The offending input field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// GST provisions could not be read, so no result can be produced.
    #[error("GST provisions unavailable for code '{code}': {message}")]
    GstUnavailable {
        /// The classification code being calculated.
        code: String,
        /// The underlying lookup failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// A rate repository could not answer a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{query} lookup failed: {message}")]
pub struct LookupFailure {
    /// The query that failed (e.g. "general rate").
    pub query: String,
    /// What went wrong in the store.
    pub message: String,
}

impl LookupFailure {
    /// Creates a new lookup failure.
    pub fn new(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            message: message.into(),
        }
    }
}

/// Result of a single repository query.
pub type LookupResult<T> = Result<T, LookupFailure>;
