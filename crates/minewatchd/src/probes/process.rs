//! Process liveness and per-process resource usage from the process table.

use minewatch_common::ProcessStatus;
use sysinfo::System;

/// Check whether a named process is running and how much it consumes.
///
/// Matches by case-insensitive substring on the process name, the same way
/// `pgrep -f` would find it, and reports the busiest matching instance.
/// No match (or an empty table after a failed refresh) yields the offline
/// reading.
pub fn check(sys: &System, name: &str) -> ProcessStatus {
    let needle = name.to_lowercase();

    let busiest = sys
        .processes()
        .values()
        .filter(|p| p.name().to_lowercase().contains(&needle))
        .max_by(|a, b| a.cpu_usage().total_cmp(&b.cpu_usage()));

    match busiest {
        Some(proc) => {
            let total_mem = sys.total_memory();
            let mem_percent = if total_mem > 0 {
                (proc.memory() as f64 / total_mem as f64 * 100.0) as f32
            } else {
                0.0
            };

            ProcessStatus {
                name: name.to_string(),
                running: true,
                cpu_percent: proc.cpu_usage(),
                mem_percent,
            }
        }
        None => ProcessStatus::offline(name),
    }
}
