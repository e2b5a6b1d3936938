//! Status aggregation - one refresh across all four sources.
//!
//! A refresh never fails: each source that errors or times out contributes
//! its zero-value reading and the snapshot is assembled from whatever came
//! back. Nothing is retried inside a cycle; the next refresh is the retry.

use crate::cache::Refresh;
use crate::config::{Config, PoolConfig, WatchConfig};
use crate::pool::PoolClient;
use crate::probes::{gpu, process, system};
use crate::xmrig::XmrigClient;
use chrono::{DateTime, Utc};
use minewatch_common::{
    MinerSummary, PoolStats, ProcessStatus, StatusSnapshot, SystemResources,
};
use sysinfo::System;
use tokio::sync::Mutex;
use tracing::debug;

pub struct StatusAggregator {
    xmrig: XmrigClient,
    pool: PoolClient,
    pool_config: PoolConfig,
    watch: WatchConfig,
    /// Kept across refreshes so CPU usage deltas have a baseline.
    system: Mutex<System>,
}

impl StatusAggregator {
    pub fn new(config: &Config) -> Self {
        Self {
            xmrig: XmrigClient::new(&config.xmrig),
            pool: PoolClient::new(&config.pool, &config.wallet),
            pool_config: config.pool.clone(),
            watch: config.watch.clone(),
            system: Mutex::new(System::new()),
        }
    }

    async fn sample_local(&self) -> (ProcessStatus, Vec<ProcessStatus>, SystemResources) {
        let mut sys = self.system.lock().await;

        sys.refresh_cpu();
        sys.refresh_processes();
        // CPU usage is a delta between two refreshes a short interval apart.
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        sys.refresh_cpu();
        sys.refresh_processes();
        sys.refresh_memory();

        let miner_process = process::check(&sys, &self.watch.miner_process);
        let aux = self
            .watch
            .aux_processes
            .iter()
            .map(|name| process::check(&sys, name))
            .collect();
        let resources = system::sample(&sys, gpu::classify());

        (miner_process, aux, resources)
    }
}

impl Refresh for StatusAggregator {
    async fn refresh(&self) -> StatusSnapshot {
        // The two HTTP sources are independent reads; run them together.
        let (miner, pool) = tokio::join!(self.xmrig.fetch(), self.pool.fetch());
        let (miner_process, aux, resources) = self.sample_local().await;

        if !miner.connected_pool.is_empty()
            && !provider_recognized(&miner.connected_pool, &self.pool_config.provider_keyword)
        {
            debug!("Miner connected to unrecognized pool: {}", miner.connected_pool);
        }

        assemble(
            Utc::now(),
            miner_process,
            aux,
            resources,
            miner,
            pool,
            &self.pool_config,
        )
    }
}

/// Build a snapshot from the collected readings.
///
/// Pure: all reconciliation rules live here so they can be exercised with
/// stub readings.
pub(crate) fn assemble(
    captured_at: DateTime<Utc>,
    process: ProcessStatus,
    aux: Vec<ProcessStatus>,
    system: SystemResources,
    miner: MinerSummary,
    pool: PoolStats,
    pool_config: &PoolConfig,
) -> StatusSnapshot {
    let effective_hashrate = effective_hashrate(pool.reported_hashrate, miner.hashrate);
    let effective_pool_name = effective_pool_name(&miner.connected_pool, pool_config);

    StatusSnapshot {
        captured_at,
        process,
        aux,
        system,
        miner,
        pool,
        effective_hashrate,
        effective_pool_name,
    }
}

/// The pool is authoritative once it has observed a share, but it reports 0
/// for a freshly started miner; the local reading bootstraps that window.
/// A genuinely idle rig reads 0 from both sources.
pub(crate) fn effective_hashrate(reported: f64, local: f64) -> f64 {
    if reported != 0.0 {
        reported
    } else {
        local
    }
}

/// Case-insensitive keyword match against the miner's connection URL.
pub(crate) fn provider_recognized(connected_pool: &str, keyword: &str) -> bool {
    connected_pool
        .to_lowercase()
        .contains(&keyword.to_lowercase())
}

/// Pool display name: the provider label when the miner's connection URL
/// matches the configured keyword, the fallback label otherwise (miner
/// offline, or pointed at a pool we have no label for).
pub(crate) fn effective_pool_name(connected_pool: &str, config: &PoolConfig) -> String {
    if provider_recognized(connected_pool, &config.provider_keyword) {
        config.provider_label.clone()
    } else {
        config.fallback_label.clone()
    }
}
