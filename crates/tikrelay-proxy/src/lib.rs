#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for the integration tests
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;

// Used by main.rs binary
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod media;
pub mod rate_limit;
pub mod relay;
pub mod routes;
pub mod server;
pub mod state;

// Re-export primary types
pub use bootstrap::{RelayContext, ServerConfig, bootstrap};
pub use error::HttpError;
pub use rate_limit::{InvalidRateLimit, RateLimitConfig};
pub use routes::create_router;
pub use server::{serve, shutdown_signal, start_server};
pub use state::AppState;
