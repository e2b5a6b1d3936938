//! HTML rendering of a snapshot. Presentation glue only; everything shown
//! here comes straight off the snapshot, amounts formatted at the last
//! moment.

use crate::config::Config;
use minewatch_common::display::format_hashrate;
use minewatch_common::{ProcessStatus, StatusSnapshot};

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, sans-serif; background: #0a0e27; color: #e0e0e0; padding: 20px; }
.container { max-width: 1000px; margin: 0 auto; }
header { text-align: center; padding: 20px; margin-bottom: 25px; border: 1px solid rgba(255,140,0,0.3); border-radius: 10px; }
h1 { font-size: 2.2em; color: #ff8c00; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 20px; }
.card { background: rgba(255,255,255,0.06); border: 1px solid rgba(255,140,0,0.3); border-radius: 10px; padding: 20px; }
h2 { font-size: 1.2em; margin-bottom: 12px; }
.row { display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid rgba(255,255,255,0.08); }
.row:last-child { border-bottom: none; }
.label { text-transform: uppercase; font-size: 0.75em; letter-spacing: 1px; color: #8899aa; }
.value { font-weight: 600; }
.online { color: #00c864; }
.offline { color: #ff3b30; }
.wallet { font-family: monospace; font-size: 0.75em; word-break: break-all; background: rgba(0,0,0,0.3); padding: 8px; border-radius: 5px; margin-top: 8px; }
footer { text-align: center; margin-top: 25px; color: #8899aa; font-size: 0.9em; }
"#;

fn status_badge(running: bool) -> &'static str {
    if running {
        r#"<span class="online">&#9679; ONLINE</span>"#
    } else {
        r#"<span class="offline">&#9679; OFFLINE</span>"#
    }
}

fn aux_rows(aux: &[ProcessStatus]) -> String {
    aux.iter()
        .map(|p| {
            format!(
                r#"<div class="row"><div class="label">{}</div><div class="value">{}</div></div>"#,
                p.name,
                status_badge(p.running)
            )
        })
        .collect()
}

/// Render the dashboard page for one snapshot.
pub fn render(snapshot: &StatusSnapshot, config: &Config) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Monero Mining Dashboard</title>
<style>{style}</style>
</head>
<body>
<div class="container">
  <header>
    <h1>&#9935; MONERO MINING</h1>
    <div class="label">Real-time mining dashboard</div>
  </header>
  <div class="grid">
    <div class="card">
      <h2>Miner ({miner_name})</h2>
      <div class="row"><div class="label">Status</div><div class="value">{miner_badge}</div></div>
      <div class="row"><div class="label">Hashrate</div><div class="value">{hashrate}</div></div>
      <div class="row"><div class="label">Active threads</div><div class="value">{threads}</div></div>
      <div class="row"><div class="label">CPU usage</div><div class="value">{proc_cpu:.1}%</div></div>
      <div class="row"><div class="label">Memory usage</div><div class="value">{proc_mem:.1}%</div></div>
      <div class="row"><div class="label">Pool</div><div class="value">{pool_name}</div></div>
      <div class="row"><div class="label">Shares</div><div class="value">{shares} accepted</div></div>
      <div class="row"><div class="label">Balance</div><div class="value">{balance} XMR</div></div>
      <div class="row"><div class="label">Total paid</div><div class="value">{paid} XMR</div></div>
      <div class="row"><div class="label">Payout minimum</div><div class="value">{payout_min} XMR</div></div>
      <div class="label" style="margin-top:12px;">Wallet address</div>
      <div class="wallet">{wallet}</div>
    </div>
    <div class="card">
      <h2>System Resources</h2>
      <div class="row"><div class="label">Total CPU usage</div><div class="value">{sys_cpu:.1}%</div></div>
      <div class="row"><div class="label">Memory usage</div><div class="value">{sys_mem:.1}%</div></div>
      <div class="row"><div class="label">Memory details</div><div class="value">{mem_used} / {mem_total}</div></div>
      <div class="row"><div class="label">GPU hardware</div><div class="value">{gpu}</div></div>
      <div class="row"><div class="label">Hostname</div><div class="value">{hostname}</div></div>
      {aux_rows}
    </div>
  </div>
  <footer>
    <div>Last updated: {captured_at} UTC</div>
    <div>Auto-refresh every {refresh_secs} seconds</div>
  </footer>
</div>
<script>setTimeout(() => window.location.reload(), {reload_ms});</script>
</body>
</html>"#,
        style = STYLE,
        miner_name = snapshot.process.name,
        miner_badge = status_badge(snapshot.process.running),
        hashrate = format_hashrate(snapshot.effective_hashrate),
        threads = snapshot.miner.active_threads,
        proc_cpu = snapshot.process.cpu_percent,
        proc_mem = snapshot.process.mem_percent,
        pool_name = snapshot.effective_pool_name,
        shares = snapshot.miner.accepted_shares,
        balance = snapshot.pool.amount_due.format_xmr(),
        paid = snapshot.pool.amount_paid.format_xmr(),
        payout_min = config.pool.payout_minimum_xmr,
        wallet = snapshot.pool.wallet.display(),
        sys_cpu = snapshot.system.cpu_percent,
        sys_mem = snapshot.system.mem_percent,
        mem_used = snapshot.system.mem_used,
        mem_total = snapshot.system.mem_total,
        gpu = snapshot.system.gpu_description,
        hostname = snapshot.system.hostname,
        aux_rows = aux_rows(&snapshot.aux),
        captured_at = snapshot.captured_at.format("%Y-%m-%d %H:%M:%S"),
        refresh_secs = config.refresh_secs,
        reload_ms = config.refresh_secs * 1000,
    )
}
