use crate::terminal::colors;
use colored::*;
use hostprobe_core::{ProbeOutcome, ProbeStatus};

/// Width reserved for `host:port` so identities line up.
const ADDRESS_WIDTH: usize = 21;
const IDENTITY_WIDTH: usize = 10;

/// One console line for an outcome as it arrives.
pub fn outcome_line(outcome: &ProbeOutcome) -> String {
    let address: ColoredString =
        format!("{:<width$}", outcome.address, width = ADDRESS_WIDTH).color(colors::PRIMARY);
    let bar: ColoredString = "│".color(colors::SEPARATOR);

    match &outcome.status {
        ProbeStatus::Success { identity, detail } => format!(
            "{} {} {} {} {} {}",
            "[+]".green().bold(),
            address,
            bar,
            format!("{:<width$}", identity.name(), width = IDENTITY_WIDTH).color(colors::IDENTITY).bold(),
            bar,
            detail.color(colors::TEXT_DEFAULT)
        ),
        ProbeStatus::Failure { error } => format!(
            "{} {} {} {}",
            "[-]".red().bold(),
            address,
            bar,
            error.color(colors::FAILURE)
        ),
    }
}

/// `(key, value)` pairs for the statistics block.
pub fn stats_to_detail(succeeded: usize, failed: usize, total: usize) -> Vec<(&'static str, ColoredString)> {
    vec![
        ("Succeeded", succeeded.to_string().green().bold()),
        ("Failed", failed.to_string().red().bold()),
        ("Total", total.to_string().color(colors::ACCENT)),
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
