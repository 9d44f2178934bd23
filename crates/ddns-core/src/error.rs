//! Error types for the Route53 DDNS updater
//!
//! Every failure in the core surfaces as one of these variants. Nothing is
//! retried here; callers decide what to do with a failed run.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// The explicit or looked-up IP address is not a valid IPv4 address,
    /// or the lookup itself failed. Fatal for the whole run.
    #[error("Invalid IP address: {0}")]
    InvalidIp(String),

    /// Listing existing record sets failed
    #[error("Record set query failed: {0}")]
    Query(String),

    /// Submitting a change batch failed
    #[error("Record set change failed: {0}")]
    Apply(String),

    /// Transport errors from the IP-echo service
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid IP error
    pub fn invalid_ip(msg: impl Into<String>) -> Self {
        Self::InvalidIp(msg.into())
    }

    /// Create a query error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create an apply error
    pub fn apply(msg: impl Into<String>) -> Self {
        Self::Apply(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error aborts the run regardless of the failure policy
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidIp(_) | Self::Config(_))
    }
}
