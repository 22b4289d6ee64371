//! HTTP request handlers for the relay.

pub mod download;
pub mod health;

use axum::response::{IntoResponse, Response};

use crate::error::HttpError;

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    HttpError::NotFound("Not found".to_string()).into_response()
}
