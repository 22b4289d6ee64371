#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod attempt;
mod client;
mod error;
mod http;
mod models;
mod port;

// ============================================================================
// Public API
// ============================================================================

pub use attempt::{AttemptOutcome, RetryReason, classify_attempt, run_attempts};
pub use client::{DefaultTikwmClient, TikwmClient};
pub use error::{TikwmError, TikwmResult};
pub use http::{HttpBackend, ReqwestBackend};

#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
