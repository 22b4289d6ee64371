//! `tikrelay` binary - the composition root.

use tikrelay_proxy::{ServerConfig, shutdown_signal, start_server};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Initialize tracing. Log level is controlled by `RUST_LOG` (default: info).
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = ServerConfig::from_env()?;
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    start_server(config, shutdown).await
}
