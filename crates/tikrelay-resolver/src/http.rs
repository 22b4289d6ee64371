//! HTTP backend abstraction for the tikwm API.
//!
//! One call on the backend is one attempt; retrying lives in
//! [`crate::attempt`], so the backend never loops.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::{TikwmError, TikwmResult, body_to_value};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that perform a single GET.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET `url` once with `timeout`, returning the body of a 2xx response.
    ///
    /// Non-2xx statuses are [`TikwmError::ApiRequestFailed`]; a missing
    /// response is [`TikwmError::NoResponse`].
    async fn get(&self, url: &Url, timeout: Duration) -> TikwmResult<Bytes>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// Holds a clone of a shared `reqwest::Client`, so the connection pool is
/// reused across requests.
#[derive(Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url, timeout: Duration) -> TikwmResult<Bytes> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(TikwmError::ApiRequestFailed {
                status: status.as_u16(),
                body: body_to_value(&body),
            });
        }
        Ok(body)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
