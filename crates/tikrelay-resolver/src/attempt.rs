//! Per-attempt classification and the bounded retry loop.
//!
//! Kept free of any HTTP client so the loop's exit conditions can be tested
//! with plain closures.

use std::future::Future;

use bytes::Bytes;
use serde_json::Value;
use tikrelay_core::ResolutionResult;
use tracing::{debug, warn};

use crate::error::{TikwmError, TikwmResult};
use crate::models::TikwmEnvelope;

/// Why an attempt is worth repeating.
#[derive(Debug)]
pub enum RetryReason {
    /// The API answered, but not with the success code. Holds the payload
    /// (`Null` if the body was empty or not JSON).
    BadPayload(Value),
    /// Transport failure on an attempt that was not the last one.
    Transport(TikwmError),
}

/// Classified result of one call to the resolution API.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Payload carrying the success code.
    Success(Value),
    /// Try again, if attempts remain.
    RetryableFailure(RetryReason),
    /// Transport failure on the final attempt; ends the loop with an error.
    FatalFailure(TikwmError),
}

/// Classify the raw result of attempt number `attempt` (1-based) out of `max`.
pub fn classify_attempt(result: TikwmResult<Bytes>, attempt: u8, max: u8) -> AttemptOutcome {
    match result {
        Ok(body) => {
            let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            if TikwmEnvelope::read(&payload).is_some_and(|envelope| envelope.is_success()) {
                AttemptOutcome::Success(payload)
            } else {
                AttemptOutcome::RetryableFailure(RetryReason::BadPayload(payload))
            }
        }
        Err(err) if attempt >= max => AttemptOutcome::FatalFailure(err),
        Err(err) => AttemptOutcome::RetryableFailure(RetryReason::Transport(err)),
    }
}

/// Run up to `max` attempts back-to-back, with no backoff.
///
/// `attempt_fn` receives the 1-based attempt number. The loop stops at the
/// first success or at a fatal failure. If the attempts run out on bad
/// payloads, the result has `succeeded == false` and carries the last payload.
pub async fn run_attempts<F, Fut>(max: u8, mut attempt_fn: F) -> TikwmResult<ResolutionResult>
where
    F: FnMut(u8) -> Fut,
    Fut: Future<Output = TikwmResult<Bytes>>,
{
    let max = max.max(1);
    let mut last_payload = Value::Null;

    for attempt in 1..=max {
        match classify_attempt(attempt_fn(attempt).await, attempt, max) {
            AttemptOutcome::Success(payload) => {
                debug!(target: "tikrelay.resolver", attempt, "Resolution succeeded");
                return Ok(ResolutionResult::success(payload, attempt));
            }
            AttemptOutcome::RetryableFailure(RetryReason::BadPayload(payload)) => {
                let msg = TikwmEnvelope::read(&payload).and_then(|envelope| envelope.msg);
                warn!(
                    target: "tikrelay.resolver",
                    attempt,
                    max,
                    msg = msg.as_deref().unwrap_or(""),
                    "Resolution API returned a failure payload"
                );
                last_payload = payload;
            }
            AttemptOutcome::RetryableFailure(RetryReason::Transport(err)) => {
                warn!(target: "tikrelay.resolver", attempt, max, error = %err, "Resolution attempt failed");
            }
            AttemptOutcome::FatalFailure(err) => {
                warn!(target: "tikrelay.resolver", attempt, error = %err, "Final resolution attempt failed");
                return Err(err);
            }
        }
    }

    Ok(ResolutionResult::exhausted(last_payload, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn body(value: &Value) -> TikwmResult<Bytes> {
        Ok(Bytes::from(value.to_string()))
    }

    fn no_response() -> TikwmResult<Bytes> {
        Err(TikwmError::NoResponse {
            message: "timed out".to_string(),
        })
    }

    #[test]
    fn test_classify_success() {
        let outcome = classify_attempt(body(&json!({"code": 0, "data": {}})), 1, 3);
        assert!(matches!(outcome, AttemptOutcome::Success(_)));
    }

    #[test]
    fn test_classify_bad_payloads() {
        for raw in [
            Bytes::from(json!({"code": -1}).to_string()),
            Bytes::from(json!({"data": {"play": "x"}}).to_string()),
            Bytes::new(),
            Bytes::from_static(b"<html>"),
        ] {
            let outcome = classify_attempt(Ok(raw), 3, 3);
            assert!(matches!(
                outcome,
                AttemptOutcome::RetryableFailure(RetryReason::BadPayload(_))
            ));
        }
    }

    #[test]
    fn test_classify_transport_depends_on_attempt() {
        assert!(matches!(
            classify_attempt(no_response(), 1, 3),
            AttemptOutcome::RetryableFailure(RetryReason::Transport(_))
        ));
        assert!(matches!(
            classify_attempt(no_response(), 3, 3),
            AttemptOutcome::FatalFailure(_)
        ));
    }

    #[tokio::test]
    async fn test_two_failures_then_success_takes_three_attempts() {
        let calls = Cell::new(0u8);
        let result = run_attempts(3, |attempt| {
            calls.set(calls.get() + 1);
            async move {
                match attempt {
                    1 => no_response(),
                    2 => body(&json!({"code": -1})),
                    _ => body(&json!({"code": 0, "data": {"play": "https://cdn.example/v.mp4"}})),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert!(result.succeeded);
        assert_eq!(result.attempts, 3);
        assert_eq!(result.direct_media_url().unwrap(), "https://cdn.example/v.mp4");
    }

    #[tokio::test]
    async fn test_bad_payload_every_time_is_exhausted_not_error() {
        let calls = Cell::new(0u8);
        let result = run_attempts(3, |attempt| {
            calls.set(calls.get() + 1);
            async move { body(&json!({"code": -1, "attempt": attempt})) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert!(!result.succeeded);
        assert_eq!(result.raw_payload["attempt"], 3);
    }

    #[tokio::test]
    async fn test_transport_error_on_final_attempt_is_raised() {
        let result = run_attempts(3, |attempt| async move {
            if attempt < 3 {
                body(&json!({"code": -1}))
            } else {
                Err(TikwmError::ApiRequestFailed {
                    status: 403,
                    body: json!({"msg": "forbidden"}),
                })
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(TikwmError::ApiRequestFailed { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_success_stops_immediately() {
        let calls = Cell::new(0u8);
        let result = run_attempts(3, |_| {
            calls.set(calls.get() + 1);
            async { body(&json!({"code": 0, "data": {}})) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test]
    async fn test_zero_max_still_makes_one_attempt() {
        let calls = Cell::new(0u8);
        let result = run_attempts(0, |_| {
            calls.set(calls.get() + 1);
            async { no_response() }
        })
        .await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(TikwmError::NoResponse { .. })));
    }
}
