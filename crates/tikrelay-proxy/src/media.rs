//! Reqwest-backed media source.
//!
//! The timeout covers establishing the stream (up to response headers), not
//! the whole transfer; stalled bodies are caught by the client's read timeout.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tikrelay_core::{MediaSourcePort, MediaStream, RelayError, RelaySettings};
use tracing::debug;

/// Opens streaming GETs to direct media URLs.
#[derive(Clone)]
pub struct ReqwestMediaSource {
    client: Client,
    timeout: Duration,
}

impl ReqwestMediaSource {
    /// Create a media source sharing `client`'s connection pool.
    pub fn new(client: Client, settings: &RelaySettings) -> Self {
        Self {
            client,
            timeout: settings.request_timeout(),
        }
    }
}

fn classify(err: &reqwest::Error) -> RelayError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        RelayError::Unreachable {
            message: err.to_string(),
        }
    } else {
        RelayError::Request {
            message: err.to_string(),
        }
    }
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl MediaSourcePort for ReqwestMediaSource {
    async fn open(&self, url: &str) -> Result<MediaStream, RelayError> {
        let send = self.client.get(url).send();
        let response = match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(classify(&e)),
            Err(_) => {
                return Err(RelayError::Unreachable {
                    message: format!("no response within {:?}", self.timeout),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let content_type = content_type(response.headers());
        let content_length = response.content_length();
        debug!(
            target: "tikrelay.relay",
            status = status.as_u16(),
            content_type = ?content_type,
            content_length = ?content_length,
            "Media stream established"
        );

        let body = response
            .bytes_stream()
            .map_err(|e| RelayError::Stream {
                message: e.to_string(),
            })
            .boxed();

        Ok(MediaStream {
            content_type,
            content_length,
            body,
        })
    }
}
