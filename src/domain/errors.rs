//! Domain error types
//!
//! This module defines the error hierarchy for LabRelay. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main LabRelay error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid input that must never be retried or enqueued
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote delivery errors (transient, retryable)
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Local durable store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A drain sweep is already running
    #[error("A drain is already in progress")]
    DrainInProgress,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while delivering a batch to the remote backend
///
/// These errors don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Failed to reach the backend at all
    #[error("Failed to connect to backend: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Every strategy for every record failed
    ///
    /// Carries the last underlying transport error so callers can
    /// report what finally went wrong.
    #[error("All delivery strategies exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Errors raised by the local pending store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open or create the store
    #[error("Failed to open store: {0}")]
    Open(String),

    /// A query or write against the store failed
    #[error("Store query failed: {0}")]
    Query(String),

    /// Stored entry could not be serialized or deserialized
    #[error("Store serialization failed: {0}")]
    Serialization(String),

    /// Schema version mismatch that could not be migrated
    #[error("Store schema migration failed: {0}")]
    Migration(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RelayError {
    fn from(err: toml::de::Error) -> Self {
        RelayError::Configuration(format!("TOML parse error: {err}"))
    }
}
