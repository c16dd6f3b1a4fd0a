//! Plain-text report of a finished run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use hostprobe_core::{ProbeStatus, RunSummary};

pub const REPORT_TITLE: &str = "HOSTPROBE - probe results";
const RULE_WIDTH: usize = 80;

/// Renders every outcome in arrival order under a dated header.
pub fn render_report(summary: &RunSummary, generated_at: &str) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&format!("Date: {generated_at}\n"));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for outcome in &summary.outcomes {
        match &outcome.status {
            ProbeStatus::Success { identity, detail } => {
                out.push_str(&format!("[OK] {}\n", outcome.address));
                out.push_str(&format!("  OS: {identity}\n"));
                out.push_str(&format!("  Info: {detail}\n"));
            }
            ProbeStatus::Failure { error } => {
                out.push_str(&format!("[ERROR] {}\n", outcome.address));
                out.push_str(&format!("  Error: {error}\n"));
            }
        }
        out.push('\n');
    }

    out
}

/// Writes the report to `path`, replacing any previous file.
pub fn write_report(summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    let timestamp: String = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let file = File::create(path)
        .with_context(|| format!("failed to create report file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render_report(summary, &timestamp).as_bytes())
        .and_then(|_| writer.flush())
        .with_context(|| format!("failed to write report file '{}'", path.display()))?;

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
