//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the relay pipeline expects from
//! infrastructure. They contain no HTTP client types; adapters map their own
//! errors onto the port errors at the boundary.

pub mod media;
pub mod metadata;

pub use media::{MediaSourcePort, MediaStream, RelayError};
pub use metadata::{MetadataResolverPort, ResolverError, ResolverResult};
