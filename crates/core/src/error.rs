//! Error types for the Vectordeck console.
//!
//! This module defines a unified error enum covering every failure category
//! the console distinguishes: configuration, I/O, transport, remote
//! rejection, validation, and serialization.

use thiserror::Error;

/// Unified error type for the Vectordeck console.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
///
/// A partial batch failure is deliberately NOT an error: batch operations
/// return a structured outcome so callers can report per-item results.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend could not be reached at all (connection refused, DNS, timeout).
    /// Callers degrade to read-only placeholder mode and keep polling.
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// Backend answered with an explicit non-success response.
    /// Callers roll back the optimistic mutation this call was confirming.
    #[error("Backend rejected request: {0}")]
    Remote(String),

    /// Client-side validation failures (empty selection, bad purpose,
    /// malformed record). Blocked before any remote call is issued.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this failure is a connectivity problem that may clear on its
    /// own, as opposed to an explicit rejection from the backend.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
