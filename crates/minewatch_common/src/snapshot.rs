//! Status snapshot - the one record shared between the HTTP dashboard and
//! the Telegram bot.
//!
//! Each source contributes an ephemeral reading; the aggregator reconciles
//! them into a `StatusSnapshot`, which is immutable once built and always
//! published as a whole. A failed source shows up as its zero-value reading,
//! never as a missing field.

use crate::amount::Piconero;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness and resource usage of one watched OS process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessStatus {
    /// Process name as matched in the process table
    pub name: String,

    /// Whether at least one matching process exists
    pub running: bool,

    /// CPU usage of the busiest matching instance
    pub cpu_percent: f32,

    /// Memory usage of that instance, percent of total RAM
    pub mem_percent: f32,
}

impl ProcessStatus {
    /// The reading reported when process enumeration fails.
    pub fn offline(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Host-wide resource utilisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemResources {
    /// Global CPU usage percent
    pub cpu_percent: f32,

    /// Used memory, human readable ("3.1Gi")
    pub mem_used: String,

    /// Total memory, human readable
    pub mem_total: String,

    /// Memory usage percent
    pub mem_percent: f32,

    /// Whether a discrete GPU was found
    pub gpu_present: bool,

    /// GPU model, or why none was found
    pub gpu_description: String,

    /// Host name
    pub hostname: String,
}

/// Reading from the miner's local summary API.
///
/// High trust for "is it mining", but the hashrate may lag right after the
/// process starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinerSummary {
    /// Total hashrate in H/s (10s average)
    pub hashrate: f64,

    /// Mining threads with a nonzero sample
    pub active_threads: u32,

    /// Pool URL the miner is connected to
    pub connected_pool: String,

    /// Accepted shares this session
    pub accepted_shares: u64,
}

/// Whether a wallet address was configured for pool lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "address", rename_all = "snake_case")]
pub enum WalletStatus {
    Configured(String),
    #[default]
    NotConfigured,
}

impl WalletStatus {
    pub fn address(&self) -> Option<&str> {
        match self {
            WalletStatus::Configured(addr) => Some(addr),
            WalletStatus::NotConfigured => None,
        }
    }

    /// Address for display, with the unconfigured sentinel spelled out.
    pub fn display(&self) -> &str {
        self.address().unwrap_or("Not configured")
    }
}

/// Reading from the remote pool's accounting API.
///
/// Authoritative for balances; its hashrate reads 0 until the pool has seen
/// a share from a freshly started miner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolStats {
    /// Hashrate as observed by the pool, H/s
    pub reported_hashrate: f64,

    /// Unpaid balance, piconero
    pub amount_due: Piconero,

    /// Lifetime paid out, piconero
    pub amount_paid: Piconero,

    /// The wallet the stats are keyed by
    pub wallet: WalletStatus,
}

impl PoolStats {
    /// Zero-value reading carrying the "not configured" marker.
    pub fn not_configured() -> Self {
        Self::default()
    }

    /// Zero-value reading for a configured wallet whose lookup failed.
    pub fn unavailable(wallet: &str) -> Self {
        Self {
            wallet: WalletStatus::Configured(wallet.to_string()),
            ..Default::default()
        }
    }
}

/// One reconciled telemetry record. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Wall-clock time of the refresh that produced this snapshot
    pub captured_at: DateTime<Utc>,

    /// The miner process itself
    pub process: ProcessStatus,

    /// Auxiliary processes (daemon, relay) watched alongside the miner
    pub aux: Vec<ProcessStatus>,

    /// Host resources
    pub system: SystemResources,

    /// Local miner API reading
    pub miner: MinerSummary,

    /// Remote pool reading
    pub pool: PoolStats,

    /// Reconciled hashrate (pool figure when nonzero, local otherwise)
    pub effective_hashrate: f64,

    /// Reconciled pool display name
    pub effective_pool_name: String,
}
