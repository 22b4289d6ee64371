//! Relay bootstrap - the composition root.
//!
//! This module is the ONLY place where the resolver and media adapters are
//! instantiated and wired to the router.

use std::sync::Arc;

use anyhow::{Context, Result};
use tikrelay_core::{MediaSourcePort, MetadataResolverPort, RelaySettings};
use tikrelay_resolver::DefaultTikwmClient;
use tokio_util::sync::CancellationToken;

use crate::media::ReqwestMediaSource;
use crate::rate_limit::{ClientRateLimiter, InvalidRateLimit, RateLimitConfig};

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration for the relay.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Per-client rate limit; `None` disables limiting.
    pub rate_limit: Option<RateLimitConfig>,
    /// Resolver and relay settings.
    pub relay: RelaySettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rate_limit: Some(RateLimitConfig::default()),
            relay: RelaySettings::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, with the port taken from `PORT` if set.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: parse_port(std::env::var("PORT").ok().as_deref())?,
            ..Self::default()
        })
    }
}

/// Parse a `PORT` value; empty or absent means the default.
pub fn parse_port(value: Option<&str>) -> Result<u16> {
    match value.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("PORT must be a port number, got {raw:?}")),
    }
}

/// Everything a request handler needs.
pub struct RelayContext {
    /// Metadata resolution port.
    pub resolver: Arc<dyn MetadataResolverPort>,
    /// Media stream port.
    pub media: Arc<dyn MediaSourcePort>,
    /// Resolver and relay settings.
    pub settings: RelaySettings,
    /// Cancelled on server shutdown; in-flight relays stop forwarding.
    pub shutdown: CancellationToken,
    /// Per-client rate limiter, if enabled.
    pub rate_limiter: Option<Arc<ClientRateLimiter>>,
}

impl RelayContext {
    /// Assemble a context from already-built ports.
    pub fn new(
        resolver: Arc<dyn MetadataResolverPort>,
        media: Arc<dyn MediaSourcePort>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            resolver,
            media,
            settings,
            shutdown: CancellationToken::new(),
            rate_limiter: None,
        }
    }

    /// Enable per-client limiting; `None` leaves it off.
    pub fn with_rate_limit(
        mut self,
        config: Option<&RateLimitConfig>,
    ) -> Result<Self, InvalidRateLimit> {
        self.rate_limiter = config.map(RateLimitConfig::build).transpose()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

/// Build the shared HTTP client and both adapters.
///
/// The resolver and the media source share one connection pool.
pub fn bootstrap(config: &ServerConfig, shutdown: CancellationToken) -> Result<RelayContext> {
    let settings = config.relay.clone();

    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .connect_timeout(settings.request_timeout())
        .read_timeout(settings.request_timeout())
        .user_agent(settings.user_agent())
        .build()
        .context("Failed to build HTTP client")?;

    let resolver = DefaultTikwmClient::new(&settings, http.clone())
        .context("Invalid resolver configuration")?;
    let media = ReqwestMediaSource::new(http, &settings);

    tracing::info!(
        target: "tikrelay.bootstrap",
        resolver_endpoint = settings.resolver_endpoint(),
        max_retries = settings.max_retries(),
        timeout = ?settings.request_timeout(),
        rate_limit = ?config.rate_limit,
        "Relay bootstrap complete"
    );

    Ok(
        RelayContext::new(Arc::new(resolver), Arc::new(media), settings)
            .with_rate_limit(config.rate_limit.as_ref())
            .context("Invalid rate limit configuration")?
            .with_shutdown(shutdown),
    )
}
