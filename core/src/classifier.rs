//! Maps raw command output to an operating system or firmware identity.
//!
//! Everything here is pure string handling: no I/O, no state. The probe engine
//! only talks to the [`Classifier`] trait so the heuristics can be swapped or
//! tested without a network.

use std::fmt;

/// Generic identification command understood by Unix-like hosts.
pub const UNAME_COMMAND: &str = "uname -a";
/// Status command understood by the FortiGate appliance shell.
pub const FORTIGATE_STATUS_COMMAND: &str = "get system status";
/// Detail used when an appliance was recognised but no version could be read.
pub const FORTIGATE_PLACEHOLDER: &str = "FortiGate device";

/// Substrings in `uname` output revealing a FortiGate answering in its own shell.
const MASQUERADE_MARKERS: &[&str] = &["Unknown action", "FortiGate"];
const UNKNOWN_ACTION: &str = "Unknown action";

/// Maximum number of characters kept from `uname` output.
pub const DETAIL_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsIdentity {
    Ubuntu,
    Debian,
    CentOs,
    RedHat,
    Fedora,
    Alpine,
    /// Linux kernel without a recognised distribution marker.
    Linux,
    MacOs,
    FreeBsd,
    OpenBsd,
    /// Matched by the classifier on `uname`-style output.
    FortiGate,
    /// Confirmed through the appliance status command.
    FortiOs,
    Unknown,
}

impl OsIdentity {
    pub fn name(&self) -> &'static str {
        match self {
            OsIdentity::Ubuntu => "Ubuntu",
            OsIdentity::Debian => "Debian",
            OsIdentity::CentOs => "CentOS",
            OsIdentity::RedHat => "Red Hat",
            OsIdentity::Fedora => "Fedora",
            OsIdentity::Alpine => "Alpine",
            OsIdentity::Linux => "Linux",
            OsIdentity::MacOs => "macOS",
            OsIdentity::FreeBsd => "FreeBSD",
            OsIdentity::OpenBsd => "OpenBSD",
            OsIdentity::FortiGate => "FortiGate",
            OsIdentity::FortiOs => "FortiOS",
            OsIdentity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OsIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identification strategy used by the probe engine.
pub trait Classifier: Send + Sync {
    /// Command run first on every host.
    fn primary_command(&self) -> &str;

    /// Identity for output of the primary command.
    fn classify(&self, raw: &str) -> OsIdentity;

    /// True when successful primary output actually comes from an appliance shell.
    fn is_masquerade(&self, trimmed: &str) -> bool;

    /// Command run when the primary one fails or is masqueraded.
    fn fallback_command(&self) -> &str;

    /// Identity reported for anything answering the fallback command.
    fn appliance(&self) -> OsIdentity;

    /// Human-readable version string from fallback output.
    fn describe_appliance(&self, raw: &str) -> String;

    /// Detail used when the appliance could not describe itself.
    fn appliance_placeholder(&self) -> &str;
}

/// Substring heuristics for `uname -a` and FortiGate `get system status`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl Classifier for HeuristicClassifier {
    fn primary_command(&self) -> &str {
        UNAME_COMMAND
    }

    fn classify(&self, raw: &str) -> OsIdentity {
        classify(raw)
    }

    fn is_masquerade(&self, trimmed: &str) -> bool {
        MASQUERADE_MARKERS
            .iter()
            .any(|marker| trimmed.contains(marker))
    }

    fn fallback_command(&self) -> &str {
        FORTIGATE_STATUS_COMMAND
    }

    fn appliance(&self) -> OsIdentity {
        OsIdentity::FortiOs
    }

    fn describe_appliance(&self, raw: &str) -> String {
        let cleaned = clean_appliance_output(raw);
        extract_appliance_version(&cleaned).unwrap_or_else(|| FORTIGATE_PLACEHOLDER.to_string())
    }

    fn appliance_placeholder(&self) -> &str {
        FORTIGATE_PLACEHOLDER
    }
}

/// Case-insensitive, first match wins. Distribution checks only run for Linux.
pub fn classify(raw: &str) -> OsIdentity {
    let lower = raw.to_lowercase();

    if lower.contains("linux") {
        return linux_distribution(&lower);
    }

    if lower.contains("darwin") {
        OsIdentity::MacOs
    } else if lower.contains("freebsd") {
        OsIdentity::FreeBsd
    } else if lower.contains("openbsd") {
        OsIdentity::OpenBsd
    } else if lower.contains("fortigate") {
        OsIdentity::FortiGate
    } else {
        OsIdentity::Unknown
    }
}

fn linux_distribution(lower: &str) -> OsIdentity {
    if lower.contains("ubuntu") {
        OsIdentity::Ubuntu
    } else if lower.contains("debian") {
        OsIdentity::Debian
    } else if lower.contains("centos") {
        OsIdentity::CentOs
    } else if lower.contains("red hat") || lower.contains("rhel") {
        OsIdentity::RedHat
    } else if lower.contains("fedora") {
        OsIdentity::Fedora
    } else if lower.contains("alpine") {
        OsIdentity::Alpine
    } else {
        OsIdentity::Linux
    }
}

/// Drops blank lines, `Unknown action` echoes and shell prompts.
pub fn clean_appliance_output(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.contains(UNKNOWN_ACTION)
                && !line.contains('$')
                && !line.ends_with('#')
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// First `Version:`/`FortiOS` or `Platform:` line, reduced to its value.
pub fn extract_appliance_version(cleaned: &str) -> Option<String> {
    for line in cleaned.lines().map(str::trim) {
        if line.contains("Version:") || line.contains("FortiOS") {
            if let Some(value) = line.split(':').nth(1) {
                let version = value.trim().split(',').next().unwrap_or_default();
                return Some(format!("FortiOS {version}"));
            }
        }

        if line.contains("Platform:") {
            if let Some(value) = line.split(':').nth(1) {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Keeps at most [`DETAIL_MAX_CHARS`] characters, marking the cut with `...`.
pub fn truncate_detail(s: &str) -> String {
    match s.char_indices().nth(DETAIL_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
