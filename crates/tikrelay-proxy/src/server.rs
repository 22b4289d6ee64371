//! HTTP server lifecycle.
//!
//! `serve()` runs the relay on a pre-bound listener until the context's
//! shutdown token is cancelled.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bootstrap::{RelayContext, ServerConfig, bootstrap};
use crate::rate_limit::ClientRateLimiter;
use crate::routes::create_router;

/// Serve the relay on `listener` until `ctx.shutdown` is cancelled.
pub async fn serve(listener: TcpListener, ctx: RelayContext) -> Result<()> {
    let addr = listener.local_addr()?;
    let shutdown = ctx.shutdown.clone();

    if let Some(limiter) = ctx.rate_limiter.clone() {
        tokio::spawn(prune_rate_limiter(limiter, shutdown.clone()));
    }

    let app = create_router(Arc::new(ctx));

    info!("Server running on http://{addr}");
    info!("Download endpoint: http://{addr}/download-video");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await?;

    info!("Server shut down");
    Ok(())
}

/// Bind `0.0.0.0:<port>`, bootstrap, and serve.
pub async fn start_server(config: ServerConfig, shutdown: CancellationToken) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let ctx = bootstrap(&config, shutdown)?;
    serve(listener, ctx).await
}

/// Drop idle per-client buckets so the limiter does not grow without bound.
async fn prune_rate_limiter(limiter: Arc<ClientRateLimiter>, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = interval.tick() => {
                limiter.retain_recent();
                limiter.shrink_to_fit();
                debug!(tracked_clients = limiter.len(), "Pruned rate limiter");
            }
        }
    }
}

/// Cancel `shutdown` on ctrl-c or SIGTERM.
pub async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
