//! Human-readable formatting helpers shared by the page and bot renderers.

/// Format a hashrate in H/s with one decimal, switching to kH/s when large.
pub fn format_hashrate(hs: f64) -> String {
    if hs >= 1000.0 {
        format!("{:.2} kH/s", hs / 1000.0)
    } else {
        format!("{:.1} H/s", hs)
    }
}

/// Format a byte count the way `free -h` would.
pub fn format_bytes(bytes: u64) -> String {
    const GIB: u64 = 1024 * 1024 * 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes >= GIB {
        format!("{:.1}Gi", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.0}Mi", bytes as f64 / MIB as f64)
    } else {
        format!("{}B", bytes)
    }
}
