//! Per-client-IP rate limiting.
//!
//! A keyed governor token bucket holding `max_requests` cells, one of which
//! comes back per `window`. No client gets more than `max_requests` through
//! within any window. Requests without connection info share one bucket.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota};
use thiserror::Error;
use tracing::warn;

use crate::error::HttpError;

/// Keyed limiter shared by all connections.
pub type ClientRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Rate limit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per client within `window`.
    pub max_requests: u32,
    /// No window of this length admits more than `max_requests`.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

/// A rate limit that cannot be enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRateLimit {
    #[error("rate limit must allow at least one request")]
    ZeroRequests,
    #[error("rate limit window must be longer than zero")]
    ZeroWindow,
}

impl RateLimitConfig {
    /// Burst of `max_requests`, replenished one cell per `window`.
    ///
    /// A bucket admits its burst plus one cell per elapsed period, so any
    /// period shorter than the window would let more than `max_requests`
    /// through within one window.
    pub fn quota(&self) -> Result<Quota, InvalidRateLimit> {
        let burst = NonZeroU32::new(self.max_requests).ok_or(InvalidRateLimit::ZeroRequests)?;
        let quota = Quota::with_period(self.window).ok_or(InvalidRateLimit::ZeroWindow)?;
        Ok(quota.allow_burst(burst))
    }

    /// Build the limiter. Use `None` in [`crate::ServerConfig`] to disable limiting.
    pub fn build(&self) -> Result<Arc<ClientRateLimiter>, InvalidRateLimit> {
        Ok(Arc::new(ClientRateLimiter::keyed(self.quota()?)))
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
            addr.ip()
        })
}

/// Middleware rejecting requests over quota with 429.
pub async fn enforce(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    if limiter.check_key(&ip).is_err() {
        warn!(client = %ip, path = %request.uri().path(), "Rate limit exceeded");
        return HttpError::TooManyRequests("Too many requests, please try again later".to_string())
            .into_response();
    }
    next.run(request).await
}
