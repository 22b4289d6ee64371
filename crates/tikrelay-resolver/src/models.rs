//! tikwm payload types and internal configuration.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tikrelay_core::RelaySettings;
use url::Url;

use crate::error::TikwmResult;

/// `code` value signalling a successful resolution.
pub const SUCCESS_CODE: i64 = 0;

/// Internal configuration derived from [`RelaySettings`].
#[derive(Debug, Clone)]
pub struct TikwmConfig {
    pub endpoint: Url,
    pub max_retries: u8,
    pub timeout: Duration,
}

impl TikwmConfig {
    pub fn from_settings(settings: &RelaySettings) -> TikwmResult<Self> {
        Ok(Self {
            endpoint: Url::parse(settings.resolver_endpoint())?,
            max_retries: settings.max_retries(),
            timeout: settings.request_timeout(),
        })
    }

    /// Build `<endpoint>?url=<source>`, keeping any query already on the endpoint.
    pub fn resolve_url(&self, source: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", source);
        url
    }
}

/// The envelope fields every tikwm response carries.
///
/// Only used to read the status; the payload itself is kept as a raw
/// [`Value`] so it can be echoed back in error details.
#[derive(Debug, Deserialize)]
pub struct TikwmEnvelope {
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl TikwmEnvelope {
    pub fn read(payload: &Value) -> Option<Self> {
        Self::deserialize(payload).ok()
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(SUCCESS_CODE))
    }
}
