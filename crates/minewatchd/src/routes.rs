//! Presentation routes.
//!
//! Two read-only endpoints: the human dashboard page and the structured
//! stats payload. Neither mutates anything; both serve from the snapshot
//! cache and only trigger a refresh through its staleness check. Unknown
//! paths fall through to axum's 404.

use crate::page;
use crate::server::AppState;
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use minewatch_common::StatusSnapshot;
use std::sync::Arc;

type AppStateArc = Arc<AppState>;

pub fn dashboard_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(index))
        .route("/api/stats", get(api_stats))
}

async fn index(State(state): State<AppStateArc>) -> Html<String> {
    let snapshot = state.cache.get().await;
    Html(page::render(&snapshot, &state.config))
}

async fn api_stats(State(state): State<AppStateArc>) -> Json<StatusSnapshot> {
    let snapshot = state.cache.get().await;
    Json((*snapshot).clone())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use minewatch_common::{
        MinerSummary, Piconero, PoolStats, ProcessStatus, StatusSnapshot, SystemResources,
        WalletStatus,
    };

    #[test]
    fn test_stats_payload_mirrors_snapshot_fields() {
        let snapshot = StatusSnapshot {
            captured_at: Utc::now(),
            process: ProcessStatus::offline("xmrig"),
            aux: vec![ProcessStatus::offline("monerod")],
            system: SystemResources::default(),
            miner: MinerSummary::default(),
            pool: PoolStats {
                amount_due: Piconero(3_000_000_000),
                wallet: WalletStatus::Configured("49KKJwFd".into()),
                ..Default::default()
            },
            effective_hashrate: 1500.0,
            effective_pool_name: "MoneroOcean".into(),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        for field in [
            "captured_at",
            "process",
            "aux",
            "system",
            "miner",
            "pool",
            "effective_hashrate",
            "effective_pool_name",
        ] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(value["effective_hashrate"], 1500.0);
        // amounts stay in smallest-unit form on the wire
        assert_eq!(value["pool"]["amount_due"], 3_000_000_000u64);
    }
}
