//! Port trait implementation for `TikwmClient`.
//!
//! Implements the core-owned `MetadataResolverPort`, mapping internal
//! `TikwmError`s to `ResolverError`.

use async_trait::async_trait;
use tikrelay_core::{MetadataResolverPort, ResolutionResult, ResolverError, ResolverResult, SourceUrl};

use crate::client::TikwmClient;
use crate::error::TikwmError;
use crate::http::HttpBackend;

/// Convert internal `TikwmError` to core `ResolverError`.
fn map_error(err: TikwmError) -> ResolverError {
    match err {
        TikwmError::ApiRequestFailed { status, body } => {
            ResolverError::UpstreamStatus { status, body }
        }
        TikwmError::NoResponse { message } => ResolverError::Timeout { message },
        TikwmError::Request { message } => ResolverError::Request { message },
        TikwmError::InvalidUrl(e) => ResolverError::Request {
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl<B: HttpBackend> MetadataResolverPort for TikwmClient<B> {
    async fn resolve(&self, url: &SourceUrl) -> ResolverResult<ResolutionResult> {
        self.resolve_with_retries(url).await.map_err(map_error)
    }
}
