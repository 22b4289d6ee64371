//! Stream relay: upstream media bytes straight into the response body.
//!
//! Hyper polls the body only when the connection can take more data, so at
//! most one upstream chunk is held at a time. Dropping the body (caller gone)
//! drops the upstream stream and releases its connection.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use tikrelay_core::{MediaStream, RelayError, RelaySettings};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{debug, error, info, warn};

use crate::error::{DOWNLOAD_FAILED, HttpError};

/// Content type sent to the caller regardless of what the media host says.
pub const RELAY_CONTENT_TYPE: &str = "video/mp4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelayState {
    Streaming,
    Finished,
    Failed,
}

/// Response body forwarding an upstream [`MediaStream`].
///
/// Ends with an error (so hyper aborts the response instead of completing
/// it) when the upstream fails mid-transfer or the server shuts down.
pub struct RelayBody {
    upstream: BoxStream<'static, Result<Bytes, RelayError>>,
    shutdown: Pin<Box<WaitForCancellationFutureOwned>>,
    forwarded: u64,
    state: RelayState,
}

impl RelayBody {
    pub fn new(
        upstream: BoxStream<'static, Result<Bytes, RelayError>>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            upstream,
            shutdown: Box::pin(shutdown.cancelled_owned()),
            forwarded: 0,
            state: RelayState::Streaming,
        }
    }

    /// Bytes handed to the response so far.
    pub const fn forwarded(&self) -> u64 {
        self.forwarded
    }
}

impl Stream for RelayBody {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.state != RelayState::Streaming {
            return Poll::Ready(None);
        }

        if this.shutdown.as_mut().poll(cx).is_ready() {
            this.state = RelayState::Failed;
            warn!(target: "tikrelay.relay", forwarded = this.forwarded, "Server shutting down, aborting relay");
            return Poll::Ready(Some(Err(io::Error::other("server shutting down"))));
        }

        match this.upstream.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.forwarded += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(err))) => {
                this.state = RelayState::Failed;
                error!(
                    target: "tikrelay.relay",
                    forwarded = this.forwarded,
                    error = %err,
                    "Error streaming video"
                );
                Poll::Ready(Some(Err(io::Error::other(err))))
            }
            Poll::Ready(None) => {
                this.state = RelayState::Finished;
                info!(target: "tikrelay.relay", forwarded = this.forwarded, "Relay complete");
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayBody {
    fn drop(&mut self) {
        if self.state == RelayState::Streaming {
            info!(
                target: "tikrelay.relay",
                forwarded = self.forwarded,
                "Caller disconnected, releasing upstream stream"
            );
        }
    }
}

/// Build the download response for an established media stream.
///
/// Headers are fixed before the first body byte is written.
pub fn download_response(
    media: MediaStream,
    settings: &RelaySettings,
    shutdown: CancellationToken,
) -> Response {
    if !media.looks_like_media() {
        warn!(
            target: "tikrelay.relay",
            content_type = media.content_type.as_deref().unwrap_or(""),
            "Media host returned a non-video content type, relaying anyway"
        );
    }

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_DISPOSITION, settings.content_disposition())
        .header(CONTENT_TYPE, RELAY_CONTENT_TYPE)
        .header(CACHE_CONTROL, "no-cache");
    if let Some(len) = media.content_length {
        builder = builder.header(CONTENT_LENGTH, len);
    }
    debug!(target: "tikrelay.relay", content_length = ?media.content_length, "Sending download headers");

    let body = Body::from_stream(RelayBody::new(media.body, shutdown));
    builder.body(body).unwrap_or_else(|e| {
        error!(target: "tikrelay.relay", error = %e, "Failed to build download response");
        HttpError::internal(DOWNLOAD_FAILED).into_response()
    })
}
