//! Minewatch Daemon - mining telemetry aggregator
//!
//! Collects miner, system, and pool telemetry into one cached snapshot and
//! serves it over an HTTP dashboard and a Telegram command bot.

use anyhow::Result;
use minewatchd::aggregator::StatusAggregator;
use minewatchd::bot::CommandBot;
use minewatchd::cache::SnapshotCache;
use minewatchd::config::{Config, CONFIG_PATH};
use minewatchd::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("minewatchd v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::var("MINEWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_PATH));
    let config = Config::load(&config_path)?;

    if config.wallet.is_empty() {
        warn!("No wallet configured; pool stats will show as not configured");
    }

    let aggregator = StatusAggregator::new(&config);
    let cache = Arc::new(SnapshotCache::new(
        aggregator,
        Duration::from_secs(config.refresh_secs),
    ));

    if config.telegram.bot_token.is_empty() {
        warn!("No Telegram bot token configured; bot disabled");
    } else {
        CommandBot::new(&config, Arc::clone(&cache)).start();
    }

    server::run(AppState::new(cache, config)).await
}
