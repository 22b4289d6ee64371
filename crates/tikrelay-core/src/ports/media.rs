//! Media source port.
//!
//! Opens a streaming connection to a direct media URL. Establishing the
//! stream and failing mid-stream are distinct error classes.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use thiserror::Error;

/// Errors from opening or reading a media stream.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The media host did not answer (timeout or connection failure).
    #[error("Media host unreachable: {message}")]
    Unreachable {
        /// Description of the transport error
        message: String,
    },

    /// The media host answered with a non-2xx status.
    #[error("Media host returned status {status}")]
    UpstreamStatus {
        /// HTTP status code from the media host
        status: u16,
    },

    /// The request could not be built or sent.
    #[error("Media request failed: {message}")]
    Request {
        /// Description of what went wrong
        message: String,
    },

    /// The stream failed after it had been established.
    #[error("Media stream failed: {message}")]
    Stream {
        /// Description of the stream error
        message: String,
    },
}

/// An established upstream media stream.
pub struct MediaStream {
    /// Content type reported by the media host.
    pub content_type: Option<String>,
    /// Content length reported by the media host.
    pub content_length: Option<u64>,
    /// The body, chunk by chunk. Errors here are [`RelayError::Stream`].
    pub body: BoxStream<'static, Result<Bytes, RelayError>>,
}

impl MediaStream {
    /// Whether the upstream content type looks like media.
    ///
    /// Missing content types are given the benefit of the doubt.
    pub fn looks_like_media(&self) -> bool {
        self.content_type.as_deref().is_none_or(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("video/") || ct.starts_with("application/octet-stream")
        })
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Port for fetching the direct media stream.
#[async_trait]
pub trait MediaSourcePort: Send + Sync {
    /// Open a streaming GET to `url`. Not retried.
    async fn open(&self, url: &str) -> Result<MediaStream, RelayError>;
}
