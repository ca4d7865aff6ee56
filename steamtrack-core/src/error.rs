//! Core error types for Steam Tracker.

use thiserror::Error;

/// Core error type for Steam Tracker operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unknown metric identifier.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
