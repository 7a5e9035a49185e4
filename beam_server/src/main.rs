//! RCC Beam Design Server
//!
//! Loads every model in the model directory once at startup and serves
//! corrected beam designs over HTTP.

use anyhow::{Context, Result};
use beam_core::file_io::load_models;
use beam_server::{build_app, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Starting RCC Beam Design Server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let models = load_models(&config.models_dir)
        .with_context(|| format!("failed to load models from {}", config.models_dir.display()))?;

    let addr: SocketAddr = config.bind_addr().parse()?;
    let app = build_app(AppState::new(config, models));

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
