//! Metadata resolution port.
//!
//! Resolves a validated TikTok URL into a [`ResolutionResult`] carrying the
//! direct media URL.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ResolutionResult, SourceUrl};

/// Errors from metadata resolution.
///
/// `UpstreamStatus`, `Timeout` and `Request` come from a transport failure on
/// the final attempt. `Exhausted` and `NoMediaUrl` are derived from a
/// [`ResolutionResult`] via [`ResolutionResult::direct_media_url`].
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The API answered with a non-2xx status.
    #[error("Resolution API returned status {status}")]
    UpstreamStatus {
        /// HTTP status code from the API
        status: u16,
        /// Response body (JSON if parseable, otherwise a string)
        body: Value,
    },

    /// The API did not answer (timeout, connection refused, reset).
    #[error("Resolution API did not respond: {message}")]
    Timeout {
        /// Description of the transport error
        message: String,
    },

    /// The request could not be built or sent.
    #[error("Resolution request failed: {message}")]
    Request {
        /// Description of what went wrong
        message: String,
    },

    /// Every attempt returned a payload without the success code.
    #[error("Resolution API gave no usable payload after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made
        attempts: u8,
        /// The last payload observed
        last_payload: Value,
    },

    /// A successful payload did not carry `data.play`.
    #[error("No video URL found in response")]
    NoMediaUrl,
}

/// Result type alias for resolution operations.
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Port for the external metadata resolution API.
#[async_trait]
pub trait MetadataResolverPort: Send + Sync {
    /// Resolve a source URL, retrying within the adapter's configured bound.
    ///
    /// Returns `Ok` with `succeeded == false` when retries ran out on bad
    /// payloads, and `Err` when the final attempt failed at the transport
    /// level.
    async fn resolve(&self, url: &SourceUrl) -> ResolverResult<ResolutionResult>;
}
