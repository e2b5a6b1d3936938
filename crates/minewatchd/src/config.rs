//! Configuration management for minewatchd.
//!
//! Loads settings from /etc/minewatch/config.toml or uses defaults. The
//! config is read once at startup and passed into every component; nothing
//! rebinds it later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Config file path
pub const CONFIG_PATH: &str = "/etc/minewatch/config.toml";

/// Top-level daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the dashboard binds to
    #[serde(default = "default_http_bind")]
    pub http_bind: String,

    /// Snapshot refresh interval in seconds
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Wallet address used for pool stats lookups; empty means not configured
    #[serde(default)]
    pub wallet: String,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub xmrig: XmrigConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_http_bind() -> String {
    "0.0.0.0:8888".to_string()
}

fn default_refresh_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_bind: default_http_bind(),
            refresh_secs: default_refresh_secs(),
            wallet: String::new(),
            pool: PoolConfig::default(),
            xmrig: XmrigConfig::default(),
            telegram: TelegramConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

/// Remote pool API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Base URL of the pool's miner stats API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Substring that identifies the provider in the miner's connection URL
    #[serde(default = "default_provider_keyword")]
    pub provider_keyword: String,

    /// Display name used when the connection URL matches the keyword
    #[serde(default = "default_provider_label")]
    pub provider_label: String,

    /// Display name used when the miner reports no or an unrecognized pool
    #[serde(default = "default_provider_label")]
    pub fallback_label: String,

    /// Payout minimum shown on the dashboard and in bot replies
    #[serde(default = "default_payout_minimum")]
    pub payout_minimum_xmr: String,
}

fn default_api_base() -> String {
    "https://api.moneroocean.stream".to_string()
}

fn default_provider_keyword() -> String {
    "moneroocean".to_string()
}

fn default_provider_label() -> String {
    "MoneroOcean".to_string()
}

fn default_payout_minimum() -> String {
    "0.003".to_string()
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            provider_keyword: default_provider_keyword(),
            provider_label: default_provider_label(),
            fallback_label: default_provider_label(),
            payout_minimum_xmr: default_payout_minimum(),
        }
    }
}

/// Local miner summary API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmrigConfig {
    /// Full URL of the miner's summary endpoint
    #[serde(default = "default_xmrig_api_url")]
    pub api_url: String,

    /// Bearer token for the summary endpoint
    #[serde(default)]
    pub token: String,

    /// Request timeout in seconds
    #[serde(default = "default_xmrig_timeout")]
    pub timeout_secs: u64,
}

fn default_xmrig_api_url() -> String {
    "http://127.0.0.1:3001/1/summary".to_string()
}

fn default_xmrig_timeout() -> u64 {
    3
}

impl Default for XmrigConfig {
    fn default() -> Self {
        Self {
            api_url: default_xmrig_api_url(),
            token: String::new(),
            timeout_secs: default_xmrig_timeout(),
        }
    }
}

/// Telegram bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Bot credential; empty disables the bot task
    #[serde(default)]
    pub bot_token: String,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            bot_token: String::new(),
        }
    }
}

/// Which processes the probe watches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// The compute process itself
    #[serde(default = "default_miner_process")]
    pub miner_process: String,

    /// Auxiliary peer/relay processes shown alongside it
    #[serde(default = "default_aux_processes")]
    pub aux_processes: Vec<String>,
}

fn default_miner_process() -> String {
    "xmrig".to_string()
}

fn default_aux_processes() -> Vec<String> {
    vec!["monerod".to_string(), "p2pool".to_string()]
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            miner_process: default_miner_process(),
            aux_processes: default_aux_processes(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is a startup error.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
