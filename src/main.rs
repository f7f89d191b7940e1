//! Frontdesk Gateway Server
//!
//! Run with: cargo run --bin frontdesk -- [--config path/to/config.toml]
//!
//! # Configuration
//!
//! Read from `--config`, or the first of `~/.config/frontdesk/config.toml`,
//! `/etc/frontdesk/config.toml` and `./frontdesk.toml`. Environment variables
//! override the file:
//! - `FRONTDESK_BACKEND_URL`: Backend API base URL (default: http://localhost:5000/api)
//! - `FRONTDESK_HOST`: Host to bind to (default: 0.0.0.0)
//! - `FRONTDESK_PORT`: Port to listen on (default: 8080)
//! - `FRONTDESK_LOG_LEVEL`, `FRONTDESK_LOG_FORMAT`: Logging (default: info, pretty)
//! - `RUST_LOG`: Full filter directive, wins over the configured level

use anyhow::Context;
use clap::Parser;
use frontdesk::client::{HttpBackend, RequestCache};
use frontdesk::config::Config;
use frontdesk::gateway::{serve, AppState};
use frontdesk::logging;
use frontdesk::routing::RouteTable;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hotel front desk gateway")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref()).context("Failed to load config")?;

    logging::init(&config.logging);

    tracing::info!("Starting Frontdesk gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend: {}", config.backend.url);

    let backend = Arc::new(
        HttpBackend::new(&config.backend).context("Failed to build backend client")?,
    );
    let cache = Arc::new(RequestCache::new(
        backend,
        Duration::from_millis(config.backend.cache_ttl_ms),
    ));

    let routes = RouteTable::hotel();
    tracing::info!("Serving {} pages", routes.len());

    let state = AppState::new(routes, cache, config.gateway.clone());
    serve(state, &config.gateway).await?;

    tracing::info!("Frontdesk gateway stopped");
    Ok(())
}
