//! Client for the remote pool's per-miner accounting API.
//!
//! MoneroOcean-style shape: `GET <api_base>/miner/<wallet>/stats` returns
//! `hash` (current hashrate as the pool sees it) plus `amtDue` / `amtPaid`
//! in piconero. The pool is authoritative for balances but lags on hashrate
//! right after the miner starts.

use crate::config::PoolConfig;
use anyhow::{bail, Result};
use minewatch_common::{Piconero, PoolStats, WalletStatus};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct PoolClient {
    client: reqwest::Client,
    api_base: String,
    wallet: String,
}

impl PoolClient {
    pub fn new(config: &PoolConfig, wallet: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            wallet: wallet.to_string(),
        }
    }

    /// Fetch the pool-side stats for the configured wallet.
    ///
    /// An empty wallet short-circuits without touching the network and
    /// carries the "not configured" marker; a failed lookup degrades to the
    /// zero-value reading for the configured wallet.
    pub async fn fetch(&self) -> PoolStats {
        if self.wallet.is_empty() {
            debug!("No wallet configured, skipping pool lookup");
            return PoolStats::not_configured();
        }

        match self.try_fetch().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Pool stats unavailable: {}", e);
                PoolStats::unavailable(&self.wallet)
            }
        }
    }

    async fn try_fetch(&self) -> Result<PoolStats> {
        let url = format!("{}/miner/{}/stats", self.api_base, self.wallet);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            bail!("pool API returned {}", response.status());
        }

        let json: Value = response.json().await?;
        Ok(parse_stats(&json, &self.wallet))
    }
}

pub(crate) fn parse_stats(json: &Value, wallet: &str) -> PoolStats {
    PoolStats {
        reported_hashrate: json.get("hash").and_then(Value::as_f64).unwrap_or(0.0),
        amount_due: piconero_field(json, "amtDue"),
        amount_paid: piconero_field(json, "amtPaid"),
        wallet: WalletStatus::Configured(wallet.to_string()),
    }
}

/// Amounts normally arrive as integers, but the API has been seen serving
/// floats; accept either and truncate into the smallest unit.
fn piconero_field(json: &Value, key: &str) -> Piconero {
    let raw = json.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    if raw.is_finite() && raw > 0.0 {
        Piconero(raw as u64)
    } else {
        Piconero::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_wallet_short_circuits() {
        // api_base that would fail instantly if contacted; the point is that
        // it never is.
        let config = PoolConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let client = PoolClient::new(&config, "");

        let stats = client.fetch().await;
        assert_eq!(stats.wallet, WalletStatus::NotConfigured);
        assert_eq!(stats.reported_hashrate, 0.0);
        assert!(stats.amount_due.is_zero());
    }

    #[test]
    fn test_parse_integer_amounts() {
        let body = json!({
            "hash": 1480.0,
            "amtDue": 3_000_000_000_000u64,
            "amtPaid": 12_000_000_000u64
        });

        let stats = parse_stats(&body, "49KKJwFd");
        assert_eq!(stats.reported_hashrate, 1480.0);
        assert_eq!(stats.amount_due, Piconero(3_000_000_000_000));
        assert_eq!(stats.amount_paid, Piconero(12_000_000_000));
        assert_eq!(stats.wallet.address(), Some("49KKJwFd"));
    }

    #[test]
    fn test_parse_float_amounts_truncate() {
        let body = json!({ "amtDue": 1.5e12 });
        assert_eq!(parse_stats(&body, "w").amount_due, Piconero(1_500_000_000_000));
    }

    #[test]
    fn test_parse_missing_fields_zeroed() {
        let stats = parse_stats(&json!({}), "w");
        assert_eq!(stats.reported_hashrate, 0.0);
        assert!(stats.amount_due.is_zero());
        assert!(stats.amount_paid.is_zero());
        // still marked as configured: the wallet exists, the data did not
        assert_eq!(stats.wallet.address(), Some("w"));
    }

    #[test]
    fn test_parse_negative_amount_clamped() {
        let stats = parse_stats(&json!({ "amtDue": -5 }), "w");
        assert!(stats.amount_due.is_zero());
    }
}
