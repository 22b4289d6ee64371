//! Loopback stub servers standing in for tikwm and the video CDN.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use futures_util::{StreamExt, stream};
use serde_json::json;
use tikrelay_core::RelaySettings;
use tikrelay_proxy::{ServerConfig, bootstrap, serve};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Size of the clip served by the media stub.
pub const CLIP_LEN: usize = 1024;

/// Deterministic clip contents.
pub fn clip() -> Vec<u8> {
    (0..CLIP_LEN).map(|i| (i % 251) as u8).collect()
}

/// Serve `router` on an ephemeral loopback port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Stub tikwm API.
pub struct ResolverStub {
    pub hits: AtomicUsize,
    pub received: Mutex<Vec<String>>,
    /// Number of leading calls answered with `fail_status`.
    pub fail_first: usize,
    pub fail_status: StatusCode,
    /// `play` value returned on success.
    pub play: String,
}

impl ResolverStub {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn resolver_api(
    State(stub): State<Arc<ResolverStub>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let hit = stub.hits.fetch_add(1, Ordering::SeqCst) + 1;
    stub.received
        .lock()
        .unwrap()
        .push(params.get("url").cloned().unwrap_or_default());

    if hit <= stub.fail_first {
        return (stub.fail_status, Json(json!({"msg": "busy"}))).into_response();
    }
    Json(json!({"code": 0, "msg": "success", "data": {"play": stub.play}})).into_response()
}

/// Start a stub resolver; returns its state and the endpoint URL.
pub async fn spawn_resolver(
    play: String,
    fail_first: usize,
    fail_status: StatusCode,
) -> (Arc<ResolverStub>, String) {
    let stub = Arc::new(ResolverStub {
        hits: AtomicUsize::new(0),
        received: Mutex::new(Vec::new()),
        fail_first,
        fail_status,
        play,
    });
    let router = Router::new()
        .route("/api/", get(resolver_api))
        .with_state(stub.clone());
    let addr = spawn(router).await;
    (stub, format!("http://{addr}/api/"))
}

async fn full_clip() -> Response {
    ([(header::CONTENT_TYPE, "video/mp4")], clip()).into_response()
}

async fn broken_clip() -> Response {
    let head = stream::iter([Ok::<_, io::Error>(Bytes::from(vec![7u8; CLIP_LEN / 2]))]);
    let tail = stream::once(async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Err(io::Error::other("upstream died"))
    });
    Response::builder()
        .header(header::CONTENT_TYPE, "video/mp4")
        .body(Body::from_stream(head.chain(tail)))
        .unwrap()
}

/// Start a stub media host serving `/video.mp4` and `/broken.mp4`.
pub async fn spawn_media_host() -> String {
    let router = Router::new()
        .route("/video.mp4", get(full_clip))
        .route("/broken.mp4", get(broken_clip));
    let addr = spawn(router).await;
    format!("http://{addr}")
}

/// Start the relay itself, pointed at `resolver_endpoint`.
pub async fn spawn_relay(resolver_endpoint: &str) -> (String, CancellationToken) {
    let config = ServerConfig {
        port: 0,
        rate_limit: None,
        relay: RelaySettings::new()
            .with_resolver_endpoint(resolver_endpoint)
            .with_request_timeout(Duration::from_secs(5)),
    };
    let shutdown = CancellationToken::new();
    let ctx = bootstrap(&config, shutdown.clone()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, ctx).await.unwrap();
    });
    (format!("http://{addr}"), shutdown)
}
