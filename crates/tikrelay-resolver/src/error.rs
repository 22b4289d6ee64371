//! Internal error types for tikwm operations.
//!
//! These errors are internal to `tikrelay-resolver` and are mapped to
//! `ResolverError` at the port boundary.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for tikwm operations.
pub type TikwmResult<T> = Result<T, TikwmError>;

/// Errors related to tikwm API calls.
#[derive(Debug, Error)]
pub enum TikwmError {
    /// API request failed with an HTTP error status.
    #[error("tikwm API request failed with status {status}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// Response body, JSON if it parsed, otherwise the raw text
        body: Value,
    },

    /// The request was sent but no response arrived.
    #[error("No response from tikwm API: {message}")]
    NoResponse {
        /// Description of the transport error
        message: String,
    },

    /// The request could not be built, or the response body could not be read.
    #[error("tikwm request failed: {message}")]
    Request {
        /// Description of what went wrong
        message: String,
    },

    /// The configured endpoint is not a valid URL.
    #[error("Invalid tikwm endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for TikwmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::NoResponse {
                message: err.to_string(),
            }
        } else {
            Self::Request {
                message: err.to_string(),
            }
        }
    }
}

/// Parse an error body as JSON, falling back to the raw text.
pub(crate) fn body_to_value(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
