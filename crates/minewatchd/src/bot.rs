//! Telegram command bot - long-poll loop.
//!
//! One dedicated task owns the loop; the channel's offset semantics are not
//! safe under concurrent pollers with the same credential. On startup the
//! backlog is drained so commands sent while the daemon was down are never
//! replayed. The cursor advances past each update before it is dispatched:
//! a crash mid-dispatch loses at most that one reply, it never duplicates
//! one after restart.

use crate::cache::{Refresh, SnapshotCache};
use crate::config::Config;
use anyhow::{bail, Result};
use minewatch_common::display::format_hashrate;
use minewatch_common::StatusSnapshot;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Server-side long-poll window in seconds.
const POLL_WINDOW_SECS: u64 = 30;

/// Client-side timeout; must outlast the server-side window.
const POLL_CLIENT_TIMEOUT: Duration = Duration::from_secs(35);

/// Sleep after a failed poll before retrying. The loop retries forever.
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Monotonic marker of the last processed update; `last_update_id` is the
/// next offset to poll with (processed id + 1). Never rewound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotCursor {
    pub last_update_id: i64,
}

impl BotCursor {
    pub fn offset(&self) -> i64 {
        self.last_update_id
    }

    /// Move past `update_id`. Out-of-order or duplicate ids cannot move the
    /// cursor backwards.
    pub fn advance(&mut self, update_id: i64) {
        self.last_update_id = self.last_update_id.max(update_id + 1);
    }
}

/// The two recognized commands. Exact match after trimming; anything else
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Status,
}

pub fn parse_command(text: &str) -> Option<Command> {
    match text.trim() {
        "/start" => Some(Command::Start),
        "/status" => Some(Command::Status),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Next offset after draining a backlog peek: one past the newest update,
/// or 0 when there is no backlog.
pub(crate) fn drained_offset(updates: &[Update]) -> i64 {
    updates.last().map(|u| u.update_id + 1).unwrap_or(0)
}

pub struct CommandBot<R> {
    client: reqwest::Client,
    base: String,
    cache: Arc<SnapshotCache<R>>,
    payout_minimum_xmr: String,
    cursor: BotCursor,
}

impl<R: Refresh + Send + Sync + 'static> CommandBot<R> {
    pub fn new(config: &Config, cache: Arc<SnapshotCache<R>>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(POLL_CLIENT_TIMEOUT)
            .build()
            .expect("reqwest client");

        Self {
            client,
            base: format!(
                "{}/bot{}",
                config.telegram.api_base.trim_end_matches('/'),
                config.telegram.bot_token
            ),
            cache,
            payout_minimum_xmr: config.pool.payout_minimum_xmr.clone(),
            cursor: BotCursor::default(),
        }
    }

    /// Spawn the polling loop as a background task.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(mut self) {
        self.cursor.last_update_id = self.drain_backlog().await;
        info!("Bot ready, listening for /start and /status");

        loop {
            match self.poll_updates().await {
                Ok(updates) => {
                    for update in updates {
                        // Advance before dispatching; see module docs.
                        self.cursor.advance(update.update_id);
                        self.dispatch(update).await;
                    }
                }
                Err(e) => {
                    warn!("Poll failed: {}, retrying in {:?}", e, POLL_BACKOFF);
                    sleep(POLL_BACKOFF).await;
                }
            }
        }
    }

    /// One-time backlog drain: peek at the single most recent update and
    /// start polling past it. On failure the cursor starts at 0 and the
    /// backlog is processed normally instead.
    async fn drain_backlog(&self) -> i64 {
        let result: Result<Vec<Update>> = async {
            let response = self
                .client
                .get(format!("{}/getUpdates", self.base))
                .query(&[("limit", "1")])
                .timeout(Duration::from_secs(5))
                .send()
                .await?;
            let body: UpdatesResponse = response.json().await?;
            Ok(body.result)
        }
        .await;

        match result {
            Ok(updates) => drained_offset(&updates),
            Err(e) => {
                warn!("Backlog drain failed: {}", e);
                0
            }
        }
    }

    async fn poll_updates(&self) -> Result<Vec<Update>> {
        let response = self
            .client
            .get(format!("{}/getUpdates", self.base))
            .query(&[
                ("offset", self.cursor.offset().to_string()),
                ("timeout", POLL_WINDOW_SECS.to_string()),
                ("allowed_updates", r#"["message"]"#.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("getUpdates returned {}", response.status());
        }

        let body: UpdatesResponse = response.json().await?;
        if !body.ok {
            bail!("getUpdates responded with ok=false");
        }

        Ok(body.result)
    }

    async fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(command) = message.text.as_deref().and_then(parse_command) else {
            return;
        };

        info!("Received {:?} from chat {}", command, message.chat.id);

        let snapshot = self.cache.get().await;
        let text = render_status(&snapshot, &self.payout_minimum_xmr);

        match self.send_message(message.chat.id, &text).await {
            Ok(()) => info!("Status sent to chat {}", message.chat.id),
            Err(e) => warn!("Failed to send status: {}", e),
        }
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.base))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("sendMessage returned {}", response.status());
        }
        Ok(())
    }
}

/// Markdown status message, one line per figure.
pub(crate) fn render_status(snapshot: &StatusSnapshot, payout_minimum_xmr: &str) -> String {
    let miner_line = if snapshot.process.running {
        "\u{2705} ONLINE"
    } else {
        "\u{274c} OFFLINE"
    };
    let closing = if snapshot.process.running {
        "\u{26a1} *STATUS: ACTIVELY MINING*"
    } else {
        "\u{274c} *STATUS: Miner offline*"
    };

    format!(
        "\u{26cf} *MONERO MINING STATUS*\n\n\
         *Miner:* {}\n\
         *Pool:* {} (0% fee)\n\
         *Hashrate:* {}\n\
         *Shares:* {} accepted\n\
         *Balance:* {} XMR\n\
         *Paid:* {} XMR\n\
         *Min Payout:* {} XMR\n\n\
         {}",
        miner_line,
        snapshot.effective_pool_name,
        format_hashrate(snapshot.effective_hashrate),
        snapshot.miner.accepted_shares,
        snapshot.pool.amount_due.format_xmr(),
        snapshot.pool.amount_paid.format_xmr(),
        payout_minimum_xmr,
        closing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use minewatch_common::{
        MinerSummary, Piconero, PoolStats, ProcessStatus, SystemResources, WalletStatus,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_parse_command_exact() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command("/status"), Some(Command::Status));
    }

    #[test]
    fn test_parse_command_trims_whitespace() {
        assert_eq!(parse_command(" /status  "), Some(Command::Status));
        assert_eq!(parse_command("\n/start\n"), Some(Command::Start));
    }

    #[test]
    fn test_parse_command_rejects_everything_else() {
        assert_eq!(parse_command("/STATUS"), None);
        assert_eq!(parse_command("/status now"), None);
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_cursor_advances_past_each_update() {
        let mut cursor = BotCursor::default();
        for id in [5, 6, 9] {
            cursor.advance(id);
        }
        assert_eq!(cursor.last_update_id, 10);
        assert_eq!(cursor.offset(), 10);
    }

    #[test]
    fn test_cursor_never_rewinds() {
        let mut cursor = BotCursor { last_update_id: 10 };
        cursor.advance(6);
        assert_eq!(cursor.last_update_id, 10);
    }

    #[test]
    fn test_drained_offset_skips_backlog() {
        let updates = vec![Update {
            update_id: 9,
            message: None,
        }];
        // A pre-start command with id <= 9 polled at offset 10 is never
        // delivered again.
        assert_eq!(drained_offset(&updates), 10);
    }

    #[test]
    fn test_drained_offset_empty_backlog() {
        assert_eq!(drained_offset(&[]), 0);
    }

    #[test]
    fn test_updates_response_parses() {
        let raw = r#"{
            "ok": true,
            "result": [
                { "update_id": 5, "message": { "text": "/status", "chat": { "id": 77 } } },
                { "update_id": 6, "message": { "chat": { "id": 77 } } }
            ]
        }"#;
        let body: UpdatesResponse = serde_json::from_str(raw).unwrap();
        assert!(body.ok);
        assert_eq!(body.result.len(), 2);
        assert_eq!(body.result[0].update_id, 5);
        assert_eq!(body.result[0].message.as_ref().unwrap().text.as_deref(), Some("/status"));
        assert!(body.result[1].message.as_ref().unwrap().text.is_none());
    }

    fn offline_snapshot() -> StatusSnapshot {
        StatusSnapshot {
            captured_at: Utc::now(),
            process: ProcessStatus::offline("xmrig"),
            aux: vec![],
            system: SystemResources::default(),
            miner: MinerSummary::default(),
            pool: PoolStats::not_configured(),
            effective_hashrate: 0.0,
            effective_pool_name: "MoneroOcean".into(),
        }
    }

    #[derive(Clone)]
    struct StubRefresher {
        calls: Arc<AtomicUsize>,
    }

    impl Refresh for StubRefresher {
        async fn refresh(&self) -> StatusSnapshot {
            self.calls.fetch_add(1, Ordering::SeqCst);
            offline_snapshot()
        }
    }

    /// Local stand-in for the message channel: counts sendMessage calls.
    async fn spawn_channel_stub() -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let sends = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&sends);
        let app = axum::Router::new().route(
            "/bottesttoken/sendMessage",
            axum::routing::post(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    axum::Json(serde_json::json!({ "ok": true }))
                }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), sends)
    }

    fn stub_bot(api_base: String, calls: Arc<AtomicUsize>) -> CommandBot<StubRefresher> {
        let mut config = Config::default();
        config.telegram.api_base = api_base;
        config.telegram.bot_token = "testtoken".to_string();

        let cache = Arc::new(SnapshotCache::new(
            StubRefresher { calls },
            Duration::from_secs(60),
        ));
        CommandBot::new(&config, cache)
    }

    #[tokio::test]
    async fn test_dispatch_status_hits_cache_once_and_sends_once() {
        let (api_base, sends) = spawn_channel_stub().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let bot = stub_bot(api_base, Arc::clone(&calls));

        bot.dispatch(Update {
            update_id: 5,
            message: Some(Message {
                text: Some(" /status  ".to_string()),
                chat: Chat { id: 77 },
            }),
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_ignores_non_commands_without_sending() {
        let (api_base, sends) = spawn_channel_stub().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let bot = stub_bot(api_base, Arc::clone(&calls));

        bot.dispatch(Update {
            update_id: 5,
            message: None,
        })
        .await;
        bot.dispatch(Update {
            update_id: 6,
            message: Some(Message {
                text: None,
                chat: Chat { id: 77 },
            }),
        })
        .await;
        bot.dispatch(Update {
            update_id: 7,
            message: Some(Message {
                text: Some("hello".to_string()),
                chat: Chat { id: 77 },
            }),
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(sends.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_render_status_online() {
        let snapshot = StatusSnapshot {
            captured_at: Utc::now(),
            process: ProcessStatus {
                name: "xmrig".into(),
                running: true,
                cpu_percent: 750.0,
                mem_percent: 11.0,
            },
            aux: vec![],
            system: SystemResources::default(),
            miner: MinerSummary {
                hashrate: 1500.0,
                active_threads: 8,
                connected_pool: "gulf.moneroocean.stream:10128".into(),
                accepted_shares: 42,
            },
            pool: PoolStats {
                reported_hashrate: 0.0,
                amount_due: Piconero(3_000_000_000),
                amount_paid: Piconero::ZERO,
                wallet: WalletStatus::Configured("49KKJwFd".into()),
            },
            effective_hashrate: 1500.0,
            effective_pool_name: "MoneroOcean".into(),
        };

        let text = render_status(&snapshot, "0.003");
        assert!(text.contains("*Pool:* MoneroOcean (0% fee)"));
        assert!(text.contains("*Hashrate:* 1.50 kH/s"));
        assert!(text.contains("*Shares:* 42 accepted"));
        assert!(text.contains("*Balance:* 0.003000 XMR"));
        assert!(text.contains("*Min Payout:* 0.003 XMR"));
        assert!(text.contains("ACTIVELY MINING"));
    }

    #[test]
    fn test_render_status_offline() {
        let snapshot = StatusSnapshot {
            captured_at: Utc::now(),
            process: ProcessStatus::offline("xmrig"),
            aux: vec![],
            system: SystemResources::default(),
            miner: MinerSummary::default(),
            pool: PoolStats::not_configured(),
            effective_hashrate: 0.0,
            effective_pool_name: "MoneroOcean".into(),
        };

        let text = render_status(&snapshot, "0.003");
        assert!(text.contains("OFFLINE"));
        assert!(text.contains("*STATUS: Miner offline*"));
        assert!(text.contains("*Balance:* 0.000000 XMR"));
    }
}
