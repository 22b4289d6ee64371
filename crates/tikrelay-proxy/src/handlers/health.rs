//! Health check endpoint.

use axum::Json;
use axum::response::IntoResponse;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy"
    }))
}
