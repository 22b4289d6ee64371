//! Terminal state of a relay request.

use std::fmt;

/// How a `/download-video` request ended.
///
/// Used to pick the response status and to tag the per-request log line.
/// Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Headers sent and the upstream stream handed to the response body.
    StreamedOk,
    /// The `url` parameter was missing or did not look like a TikTok link.
    ValidationFailed,
    /// The metadata API could not produce a direct media URL.
    ResolutionFailed(ResolutionCause),
    /// The resolution API or the media host never answered.
    UpstreamTimeout,
    /// The media stream could not be opened or failed while relaying.
    StreamError,
}

/// Why resolution failed, for [`RelayOutcome::ResolutionFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionCause {
    /// The API answered with an HTTP error status.
    UpstreamStatus(u16),
    /// Every attempt returned a payload with a non-success code.
    Exhausted,
    /// The payload succeeded but carried no media URL.
    NoMediaUrl,
    /// The request could not be built or sent.
    Request,
}

impl RelayOutcome {
    /// Short stable label for structured logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StreamedOk => "streamed_ok",
            Self::ValidationFailed => "validation_failed",
            Self::ResolutionFailed(_) => "resolution_failed",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::StreamError => "stream_error",
        }
    }
}

impl fmt::Display for RelayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolutionFailed(cause) => write!(f, "{}({cause:?})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}
