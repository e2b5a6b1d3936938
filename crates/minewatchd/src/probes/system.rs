//! Host-wide resource sampling.

use crate::probes::gpu::GpuReport;
use minewatch_common::display::format_bytes;
use minewatch_common::SystemResources;
use sysinfo::System;

/// Build the host resource reading from an already-refreshed `System`.
///
/// The caller owns the refresh cadence (CPU usage needs two refreshes a
/// short interval apart); this stays a pure read so it can be sampled
/// together with the process probe under one lock.
pub fn sample(sys: &System, gpu: GpuReport) -> SystemResources {
    let total = sys.total_memory();
    let used = sys.used_memory();
    let mem_percent = if total > 0 {
        (used as f64 / total as f64 * 100.0) as f32
    } else {
        0.0
    };

    let cpu_percent = if sys.cpus().is_empty() {
        0.0
    } else {
        sys.cpus().iter().map(|cpu| cpu.cpu_usage()).sum::<f32>() / sys.cpus().len() as f32
    };

    SystemResources {
        cpu_percent,
        mem_used: format_bytes(used),
        mem_total: format_bytes(total),
        mem_percent,
        gpu_present: gpu.present,
        gpu_description: gpu.description,
        hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
    }
}
