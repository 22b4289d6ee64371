//! `GET /download-video`: validate → resolve → relay.
//!
//! Stages run strictly in sequence; only the resolver retries. Every failure
//! is mapped to exactly one [`HttpError`] response here.

use std::fmt;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tikrelay_core::{RelayError, RelayOutcome, ResolutionCause, ResolverError, SourceUrl};
use tracing::{error, info, warn};

use crate::error::HttpError;
use crate::relay::download_response;
use crate::state::AppState;

/// Query string of `/download-video`.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
}

/// Outcome for a resolution failure.
pub const fn resolution_outcome(err: &ResolverError) -> RelayOutcome {
    match err {
        ResolverError::Timeout { .. } => RelayOutcome::UpstreamTimeout,
        ResolverError::UpstreamStatus { status, .. } => {
            RelayOutcome::ResolutionFailed(ResolutionCause::UpstreamStatus(*status))
        }
        ResolverError::Exhausted { .. } => {
            RelayOutcome::ResolutionFailed(ResolutionCause::Exhausted)
        }
        ResolverError::NoMediaUrl => RelayOutcome::ResolutionFailed(ResolutionCause::NoMediaUrl),
        ResolverError::Request { .. } => RelayOutcome::ResolutionFailed(ResolutionCause::Request),
    }
}

/// Outcome for a failure to open the media stream.
pub const fn relay_outcome(err: &RelayError) -> RelayOutcome {
    match err {
        RelayError::Unreachable { .. } => RelayOutcome::UpstreamTimeout,
        _ => RelayOutcome::StreamError,
    }
}

fn reject<E>(outcome: RelayOutcome, err: E) -> Response
where
    E: fmt::Display + Into<HttpError>,
{
    if outcome == RelayOutcome::ValidationFailed {
        warn!(outcome = %outcome, error = %err, "Rejected download request");
    } else {
        error!(outcome = %outcome, error = %err, "Download error");
    }
    err.into().into_response()
}

/// Handle `GET /download-video?url=...`.
///
/// A malformed query string is treated like a missing `url`.
pub async fn download_video(
    State(state): State<AppState>,
    query: Result<Query<DownloadRequest>, QueryRejection>,
) -> Response {
    let request = query.map(|Query(q)| q).unwrap_or_default();

    let source = match SourceUrl::parse(request.url.as_deref()) {
        Ok(source) => source,
        Err(e) => return reject(RelayOutcome::ValidationFailed, e),
    };

    let resolution = match state.resolver.resolve(&source).await {
        Ok(resolution) => resolution,
        Err(e) => return reject(resolution_outcome(&e), e),
    };

    let media_url = match resolution.direct_media_url() {
        Ok(url) => url.to_string(),
        Err(e) => return reject(resolution_outcome(&e), e),
    };

    let media = match state.media.open(&media_url).await {
        Ok(media) => media,
        Err(e) => return reject(relay_outcome(&e), e),
    };

    info!(
        outcome = %RelayOutcome::StreamedOk,
        source = %source,
        attempts = resolution.attempts,
        content_length = ?media.content_length,
        "Relaying video"
    );
    download_response(media, &state.settings, state.shutdown.child_token())
}
