//! Axum-specific error types and mappings.
//!
//! Maps validation, resolution and relay errors to HTTP status codes and
//! `{"error": ..., "details"?: ...}` bodies. Every failure in the pipeline
//! ends up here, so a request always gets exactly one response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tikrelay_core::{InvalidSourceUrl, RelayError, ResolverError};

const API_REQUEST_FAILED: &str = "API request failed";
const API_TIMED_OUT: &str = "API request timed out";
const VIDEO_HOST_TIMED_OUT: &str = "Video host timed out";
pub(crate) const DOWNLOAD_FAILED: &str = "Failed to download video";

/// Message returned for panics; internals never reach the caller.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (missing or invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown route.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Per-client quota used up.
    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// The resolution API answered with an error status; mirrored to the caller.
    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16, details: Value },

    /// An upstream host did not respond.
    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        details: Option<Value>,
    },
}

impl HttpError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            // Only error statuses are mirrored; anything else becomes a 502
            Self::UpstreamStatus { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = match self {
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::TooManyRequests(msg)
            | Self::GatewayTimeout(msg) => (msg, None),
            Self::UpstreamStatus { details, .. } => (API_REQUEST_FAILED.to_string(), Some(details)),
            Self::Internal { message, details } => (message, details),
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<InvalidSourceUrl> for HttpError {
    fn from(err: InvalidSourceUrl) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ResolverError> for HttpError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::UpstreamStatus { status, body } => Self::UpstreamStatus {
                status,
                details: body,
            },
            ResolverError::Timeout { .. } => Self::GatewayTimeout(API_TIMED_OUT.to_string()),
            ResolverError::Request { .. } => Self::internal(DOWNLOAD_FAILED),
            ResolverError::Exhausted { last_payload, .. } => Self::Internal {
                message: DOWNLOAD_FAILED.to_string(),
                details: Some(last_payload),
            },
            ResolverError::NoMediaUrl => Self::Internal {
                message: DOWNLOAD_FAILED.to_string(),
                details: Some(Value::String(ResolverError::NoMediaUrl.to_string())),
            },
        }
    }
}

impl From<RelayError> for HttpError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Unreachable { .. } => {
                Self::GatewayTimeout(VIDEO_HOST_TIMED_OUT.to_string())
            }
            RelayError::UpstreamStatus { status } => Self::Internal {
                message: DOWNLOAD_FAILED.to_string(),
                details: Some(json!({ "status": status })),
            },
            RelayError::Request { .. } | RelayError::Stream { .. } => {
                Self::internal(DOWNLOAD_FAILED)
            }
        }
    }
}
