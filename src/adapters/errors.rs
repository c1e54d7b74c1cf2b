//! Exchange adapter error types
//!
//! All exchange-related errors are wrapped in ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Exchange-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection to exchange failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Exchange refused our credentials or signature
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A bearer-authorized call was attempted without a token
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// Order parameters cannot be encoded or are out of range
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Exchange accepted the request but rejected the order
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Key parsing or signature generation failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Non-2xx HTTP status returned by the exchange
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl ExchangeError {
    /// Map a transport-level reqwest error, keeping timeouts distinguishable.
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ExchangeError::NetworkTimeout(timeout_ms)
        } else {
            ExchangeError::ConnectionFailed(err.to_string())
        }
    }
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
