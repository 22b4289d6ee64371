//! In-process fakes for the resolver and media ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use futures_util::{StreamExt, stream};
use serde_json::json;
use tikrelay_core::{
    MediaSourcePort, MediaStream, MetadataResolverPort, RelayError, RelaySettings,
    ResolutionResult, ResolverResult, SourceUrl,
};
use tikrelay_proxy::{RateLimitConfig, RelayContext, create_router};

type ResolveFn = dyn Fn() -> ResolverResult<ResolutionResult> + Send + Sync;
type OpenFn = dyn Fn() -> Result<MediaStream, RelayError> + Send + Sync;

/// Resolver returning a canned result and counting calls.
pub struct FakeResolver {
    reply: Box<ResolveFn>,
    calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new(reply: impl Fn() -> ResolverResult<ResolutionResult> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
        })
    }

    /// Resolves every URL to [`super::MEDIA_URL`].
    pub fn resolving_to_media() -> Arc<Self> {
        Self::new(|| {
            Ok(ResolutionResult::success(
                json!({"code": 0, "msg": "success", "data": {"play": super::MEDIA_URL}}),
                1,
            ))
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataResolverPort for FakeResolver {
    async fn resolve(&self, _url: &SourceUrl) -> ResolverResult<ResolutionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

/// Media source returning a canned stream and recording requested URLs.
pub struct FakeMedia {
    reply: Box<OpenFn>,
    urls: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn new(reply: impl Fn() -> Result<MediaStream, RelayError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            urls: Mutex::new(Vec::new()),
        })
    }

    /// Streams `payload` in 256-byte chunks.
    pub fn serving(payload: Vec<u8>) -> Arc<Self> {
        Self::new(move || {
            let chunks: Vec<Result<Bytes, RelayError>> = payload
                .chunks(256)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();
            Ok(MediaStream {
                content_type: Some("video/mp4".to_string()),
                content_length: Some(payload.len() as u64),
                body: stream::iter(chunks).boxed(),
            })
        })
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSourcePort for FakeMedia {
    async fn open(&self, url: &str) -> Result<MediaStream, RelayError> {
        self.urls.lock().unwrap().push(url.to_string());
        (self.reply)()
    }
}

/// Router over the given fakes, without rate limiting.
pub fn app(resolver: Arc<FakeResolver>, media: Arc<FakeMedia>) -> Router {
    create_router(Arc::new(RelayContext::new(
        resolver,
        media,
        RelaySettings::new(),
    )))
}

/// Router over the given fakes, limited to `max_requests` per hour.
pub fn rate_limited_app(resolver: Arc<FakeResolver>, media: Arc<FakeMedia>, max_requests: u32) -> Router {
    let limit = RateLimitConfig {
        max_requests,
        window: std::time::Duration::from_secs(3600),
    };
    let ctx = RelayContext::new(resolver, media, RelaySettings::new())
        .with_rate_limit(Some(&limit))
        .unwrap();
    create_router(Arc::new(ctx))
}
