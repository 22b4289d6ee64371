//! tikwm client: one resolve call, bounded retries.

use tikrelay_core::{RelaySettings, ResolutionResult, SourceUrl};
use tracing::debug;

use crate::attempt::run_attempts;
use crate::error::TikwmResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::TikwmConfig;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default tikwm client using the reqwest HTTP backend.
pub type DefaultTikwmClient = TikwmClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the tikwm resolution API.
///
/// Generic over the HTTP backend so the retry behaviour can be exercised
/// without a network. Use [`DefaultTikwmClient`] in production code.
pub struct TikwmClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: TikwmConfig,
}

impl DefaultTikwmClient {
    /// Create a client on top of a shared `reqwest::Client`.
    ///
    /// Fails only if the configured endpoint is not a valid URL.
    pub fn new(settings: &RelaySettings, http: reqwest::Client) -> TikwmResult<Self> {
        Ok(Self {
            backend: ReqwestBackend::new(http),
            config: TikwmConfig::from_settings(settings)?,
        })
    }
}

impl<B: HttpBackend> TikwmClient<B> {
    /// Create a client with a custom backend.
    pub fn with_backend(settings: &RelaySettings, backend: B) -> TikwmResult<Self> {
        Ok(Self {
            backend,
            config: TikwmConfig::from_settings(settings)?,
        })
    }

    /// Resolve `source`, making up to `max_retries` calls.
    pub async fn resolve_with_retries(&self, source: &SourceUrl) -> TikwmResult<ResolutionResult> {
        let url = self.config.resolve_url(source.as_str());
        debug!(target: "tikrelay.resolver", source = %source, "Resolving source URL");

        run_attempts(self.config.max_retries, |_| {
            self.backend.get(&url, self.config.timeout)
        })
        .await
    }
}
