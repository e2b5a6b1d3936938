//! HTTP server for minewatchd.

use crate::aggregator::StatusAggregator;
use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub cache: Arc<SnapshotCache<StatusAggregator>>,
    pub config: Config,
}

impl AppState {
    pub fn new(cache: Arc<SnapshotCache<StatusAggregator>>, config: Config) -> Self {
        Self { cache, config }
    }
}

/// Run the HTTP server. Failure to bind is fatal.
pub async fn run(state: AppState) -> Result<()> {
    let bind = state.config.http_bind.clone();
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::dashboard_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("  Dashboard listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
