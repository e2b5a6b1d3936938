//! Client for the miner's local summary API.
//!
//! XMRig serves `GET /1/summary` behind a bearer token. This source is the
//! low-latency view of the miner: it knows instantly whether mining runs and
//! at what rate, but the pool has the authoritative accounting.

use crate::config::XmrigConfig;
use anyhow::{bail, Result};
use minewatch_common::MinerSummary;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

pub struct XmrigClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl XmrigClient {
    pub fn new(config: &XmrigConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client");

        Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Fetch the current miner summary.
    ///
    /// Non-200, timeout, and malformed bodies all degrade to the zero-value
    /// reading; the refresh cycle is the retry unit.
    pub async fn fetch(&self) -> MinerSummary {
        match self.try_fetch().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Miner summary unavailable: {}", e);
                MinerSummary::default()
            }
        }
    }

    async fn try_fetch(&self) -> Result<MinerSummary> {
        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("miner API returned {}", response.status());
        }

        let json: Value = response.json().await?;
        Ok(parse_summary(&json))
    }
}

/// Pull the fields we care about out of XMRig's summary JSON.
///
/// Every absent field defaults to its zero value. Active threads are those
/// whose first hashrate sample is positive.
pub(crate) fn parse_summary(json: &Value) -> MinerSummary {
    let hashrate = json
        .get("hashrate")
        .and_then(|h| h.get("total"))
        .and_then(|t| t.get(0))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let active_threads = json
        .get("hashrate")
        .and_then(|h| h.get("threads"))
        .and_then(Value::as_array)
        .map(|threads| {
            threads
                .iter()
                .filter(|t| t.get(0).and_then(Value::as_f64).unwrap_or(0.0) > 0.0)
                .count() as u32
        })
        .unwrap_or(0);

    let connected_pool = json
        .get("connection")
        .and_then(|c| c.get("pool"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let accepted_shares = json
        .get("results")
        .and_then(|r| r.get("shares_good"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    MinerSummary {
        hashrate,
        active_threads,
        connected_pool,
        accepted_shares,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_parse_full_summary() {
        let body = json!({
            "hashrate": {
                "total": [1532.4, 1498.0, null],
                "threads": [[200.1], [195.0], [0.0], [null]]
            },
            "connection": { "pool": "gulf.moneroocean.stream:10128" },
            "results": { "shares_good": 42 }
        });

        let summary = parse_summary(&body);
        assert_relative_eq!(summary.hashrate, 1532.4);
        assert_eq!(summary.active_threads, 2);
        assert_eq!(summary.connected_pool, "gulf.moneroocean.stream:10128");
        assert_eq!(summary.accepted_shares, 42);
    }

    #[test]
    fn test_parse_empty_body_is_zero_reading() {
        let summary = parse_summary(&json!({}));
        assert_eq!(summary.hashrate, 0.0);
        assert_eq!(summary.active_threads, 0);
        assert!(summary.connected_pool.is_empty());
        assert_eq!(summary.accepted_shares, 0);
    }

    #[test]
    fn test_parse_null_hashrate_sample() {
        // XMRig reports null for averages it has not computed yet
        let body = json!({ "hashrate": { "total": [null, null, null] } });
        assert_eq!(parse_summary(&body).hashrate, 0.0);
    }
}
