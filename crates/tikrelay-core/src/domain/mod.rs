//! Domain types for the relay pipeline.
//!
//! All of these are request-scoped values; nothing here outlives a single
//! HTTP request.

mod outcome;
mod resolution;
mod source_url;

pub use outcome::{RelayOutcome, ResolutionCause};
pub use resolution::ResolutionResult;
pub use source_url::{InvalidSourceUrl, SourceUrl, is_valid_tiktok_url};
