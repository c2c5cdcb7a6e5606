//! Error types for plotrc.
//!
//! A single error enum covers configuration lookups, validation failures,
//! settings resolution and the two-phase settings records.

use thiserror::Error;

/// The main error type for plotrc operations.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Unknown configuration key
    #[error("Unknown rc setting: {key:?}")]
    KeyNotFound { key: String },

    /// A value was rejected by the validator registered for its key
    #[error("Invalid value {value} for rc setting {key:?}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    /// A resolved settings field failed its type or range check
    #[error("Invalid setting {field:?}: {message}")]
    InvalidSettings { field: String, message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// The default table itself is inconsistent
    #[error("Inconsistent default rc table at {key:?}: {message}")]
    DefaultTable { key: String, message: String },

    /// A derived field was read before the derivation step ran
    #[error("Derived field {field:?} read before finalize")]
    NotFinalized { field: String },

    /// The derivation step ran twice on the same record
    #[error("Derived field {field:?} already finalized")]
    AlreadyFinalized { field: String },

    /// Configuration loading errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlotError {
    pub(crate) fn invalid_settings(field: &str, message: impl Into<String>) -> Self {
        PlotError::InvalidSettings {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
