//! Terminus server (default binary).
//!
//! Loads configuration and the map, starts the shared world ticker and serves
//! telnet clients until Ctrl-C.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use terminus::adapter::{build_world, run_server, spawn_world_ticker, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    let world = build_world(&config)?;
    let ticker = spawn_world_ticker(world.clone(), config.tick_hz);

    let result = tokio::select! {
        res = run_server(config, world, None) => res,
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for Ctrl-C")?;
            info!("shutting down");
            Ok(())
        }
    };

    ticker.abort();
    result
}
