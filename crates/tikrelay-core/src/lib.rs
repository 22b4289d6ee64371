#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    InvalidSourceUrl, RelayOutcome, ResolutionCause, ResolutionResult, SourceUrl,
    is_valid_tiktok_url,
};
pub use ports::{
    MediaSourcePort, MediaStream, MetadataResolverPort, RelayError, ResolverError, ResolverResult,
};
pub use settings::{
    DEFAULT_DOWNLOAD_FILENAME, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_RESOLVER_ENDPOINT, RelaySettings,
};

#[cfg(test)]
use tokio as _;
