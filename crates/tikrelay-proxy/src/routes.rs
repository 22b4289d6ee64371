//! Route definitions and router construction.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::{GENERIC_FAILURE, HttpError};
use crate::handlers;
use crate::rate_limit;
use crate::state::AppState;

/// Permissive CORS: any origin, method and header.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

/// Last-resort handler: a panic still produces exactly one generic 500.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "Unhandled error while serving request");
    HttpError::internal(GENERIC_FAILURE).into_response()
}

/// Create the relay router.
///
/// Layer order, outermost first: panic safety net, tracing, CORS, rate limit.
pub fn create_router(state: AppState) -> Router {
    let limiter = state.rate_limiter.clone();

    let mut router = Router::new()
        .route("/download-video", get(handlers::download::download_video))
        .route("/health", get(handlers::health::health_check))
        .fallback(handlers::not_found)
        .with_state(state);

    if let Some(limiter) = limiter {
        router = router.layer(middleware::from_fn_with_state(limiter, rate_limit::enforce));
    }

    router
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}
