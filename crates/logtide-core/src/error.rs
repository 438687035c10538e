//! Error types for the log store.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur in the log store and its sweeper.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A service name was empty.
    #[error("service name cannot be empty")]
    EmptyServiceName,

    /// The query range ends before it starts.
    #[error("invalid time range: start={start} is after end={end}")]
    InvalidRange {
        /// Requested start of the range.
        start: DateTime<Utc>,
        /// Requested end of the range.
        end: DateTime<Utc>,
    },

    /// A retention or sweep setting is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An expiration pass could not complete.
    #[error("expiration failed: {0}")]
    ExpireFailed(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
