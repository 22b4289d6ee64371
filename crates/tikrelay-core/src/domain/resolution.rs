//! Result of resolving a source URL through the metadata API.

use serde_json::Value;

use crate::ports::ResolverError;

/// What one `resolve` call produced.
///
/// `succeeded == false` means every attempt returned a payload with a bad
/// status code (or the last attempt did); transport failures on the final
/// attempt are reported as `Err(ResolverError)` instead and never reach this
/// type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    /// Whether a payload with the success sentinel was obtained.
    pub succeeded: bool,
    /// `data.play` from a successful payload, if present.
    pub direct_media_url: Option<String>,
    /// The last payload observed (`Null` if the body was empty or not JSON).
    pub raw_payload: Value,
    /// Number of calls made to the resolution API.
    pub attempts: u8,
}

impl ResolutionResult {
    /// Build a successful result, extracting `data.play` from the payload.
    pub fn success(payload: Value, attempts: u8) -> Self {
        let direct_media_url = payload
            .get("data")
            .and_then(|data| data.get("play"))
            .and_then(Value::as_str)
            .filter(|play| !play.is_empty())
            .map(str::to_string);

        Self {
            succeeded: true,
            direct_media_url,
            raw_payload: payload,
            attempts,
        }
    }

    /// Build a result for retries exhausted on bad payloads.
    pub const fn exhausted(last_payload: Value, attempts: u8) -> Self {
        Self {
            succeeded: false,
            direct_media_url: None,
            raw_payload: last_payload,
            attempts,
        }
    }

    /// The direct media URL, or the reason there is none.
    ///
    /// A successful payload without `data.play` is terminal: it yields
    /// [`ResolverError::NoMediaUrl`] rather than anything retryable.
    pub fn direct_media_url(&self) -> Result<&str, ResolverError> {
        if !self.succeeded {
            return Err(ResolverError::Exhausted {
                attempts: self.attempts,
                last_payload: self.raw_payload.clone(),
            });
        }
        self.direct_media_url
            .as_deref()
            .ok_or(ResolverError::NoMediaUrl)
    }
}
