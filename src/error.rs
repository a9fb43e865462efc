//! Error types for the screening engine.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Session configuration rejected at creation time
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid input parameters provided (e.g. a malformed prior baseline)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No session is registered under the given handle
    #[error("Unknown session: {0}")]
    UnknownSession(u64),

    /// Speech calibration sample shorter than the minimum duration
    #[error("Calibration too short: {duration:.2}s (minimum {minimum:.0}s)")]
    CalibrationTooShort {
        /// Duration of the rejected sample in seconds
        duration: f64,
        /// Minimum accepted duration in seconds
        minimum: f64,
    },

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
