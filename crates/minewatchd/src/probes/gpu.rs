//! GPU classification via a ranked strategy chain.
//!
//! Each strategy either answers definitively or reports "inconclusive"
//! (`None`), in which case the next one runs. Tiers, most specific first:
//! vendor tool (`nvidia-smi`), vendor keywords in `lspci` display lines,
//! any `lspci` display line at all. Total failure classifies as no GPU.

use std::process::Command;
use tracing::debug;

/// Outcome of GPU classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuReport {
    /// Whether discrete GPU hardware is present
    pub present: bool,

    /// Model or classification text for display
    pub description: String,
}

impl GpuReport {
    fn discrete(description: impl Into<String>) -> Self {
        Self {
            present: true,
            description: description.into(),
        }
    }

    /// The answer when every strategy comes up empty.
    pub fn none_detected() -> Self {
        Self {
            present: false,
            description: "No GPU detected".to_string(),
        }
    }
}

type Strategy = fn() -> Option<GpuReport>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("nvidia-smi", nvidia_smi),
    ("lspci vendor match", lspci_vendor),
    ("lspci display listing", lspci_integrated),
];

/// Run the strategy chain; the first definitive answer wins.
pub fn classify() -> GpuReport {
    for (name, strategy) in STRATEGIES {
        if let Some(report) = strategy() {
            debug!("GPU classified by {}: {}", name, report.description);
            return report;
        }
    }
    GpuReport::none_detected()
}

fn nvidia_smi() -> Option<GpuReport> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=name", "--format=csv,noheader"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_nvidia_names(&String::from_utf8_lossy(&output.stdout))
}

fn parse_nvidia_names(stdout: &str) -> Option<GpuReport> {
    let name = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(GpuReport::discrete(name))
}

fn lspci_vendor() -> Option<GpuReport> {
    parse_lspci_vendor(&lspci_output()?)
}

fn parse_lspci_vendor(stdout: &str) -> Option<GpuReport> {
    let display: Vec<String> = display_lines(stdout);

    if display
        .iter()
        .any(|l| l.contains("amd") || l.contains("radeon"))
    {
        return Some(GpuReport::discrete("AMD GPU detected"));
    }
    if display.iter().any(|l| l.contains("nvidia")) {
        return Some(GpuReport::discrete("NVIDIA GPU detected"));
    }

    None
}

fn lspci_integrated() -> Option<GpuReport> {
    parse_lspci_integrated(&lspci_output()?)
}

fn parse_lspci_integrated(stdout: &str) -> Option<GpuReport> {
    if display_lines(stdout).is_empty() {
        return None;
    }

    // A display adapter exists but no discrete vendor matched above.
    Some(GpuReport {
        present: false,
        description: "Integrated GPU (CPU mining only)".to_string(),
    })
}

fn lspci_output() -> Option<String> {
    let output = Command::new("lspci").output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn display_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|l| l.to_lowercase())
        .filter(|l| l.contains("vga") || l.contains("3d") || l.contains("display"))
        .collect()
}
