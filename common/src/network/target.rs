//! # Probe Target Model
//!
//! Defines a single host to be probed and the reader for the credentials file.
//!
//! Every non-empty line of the file describes exactly one target:
//!
//! ```text
//! HOST:PORT@USER:PASSWORD
//! ```
//!
//! Malformed lines never abort loading; they are reported and skipped.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use thiserror::Error;

use crate::{success, warn};

/// One host together with the credential pair used to log into it.
#[derive(Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl HostTarget {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }

    /// `host:port`, the key every outcome is reported under.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Never leak the password through `{:?}`.
impl fmt::Debug for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
    #[error("invalid line format: {0}")]
    MissingSeparator(String),
    #[error("invalid host format: {0}")]
    InvalidHost(String),
    #[error("invalid port in '{0}'")]
    InvalidPort(String),
    #[error("invalid credentials format: {0}")]
    InvalidCredentials(String),
}

impl FromStr for HostTarget {
    type Err = TargetParseError;

    /// Parses `HOST:PORT@USER:PASSWORD`.
    ///
    /// Each side of the `@` must split into exactly two parts around a single `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();

        let (host_port, credentials) = split_exactly_two(line, '@')
            .ok_or_else(|| TargetParseError::MissingSeparator(line.to_string()))?;

        let (host, port) = parse_host_port(host_port)?;

        let (username, password) = split_exactly_two(credentials, ':')
            .ok_or_else(|| TargetParseError::InvalidCredentials(redact(credentials)))?;

        Ok(HostTarget::new(host, port, username, password))
    }
}

/// Splits `s` around `sep`, succeeding only when `sep` occurs exactly once.
fn split_exactly_two(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut parts = s.split(sep);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => Some((left, right)),
        _ => None,
    }
}

fn parse_host_port(s: &str) -> Result<(&str, u16), TargetParseError> {
    let (host, port_str) =
        split_exactly_two(s, ':').ok_or_else(|| TargetParseError::InvalidHost(s.to_string()))?;

    if host.is_empty() {
        return Err(TargetParseError::InvalidHost(s.to_string()));
    }

    let port = port_str
        .parse::<u16>()
        .map_err(|_| TargetParseError::InvalidPort(s.to_string()))?;

    Ok((host, port))
}

/// Keeps the username visible but hides anything after it.
fn redact(credentials: &str) -> String {
    match credentials.split_once(':') {
        Some((user, _)) => format!("{user}:***"),
        None => credentials.to_string(),
    }
}

/// A line that could not be turned into a [`HostTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the source.
    pub line_no: usize,
    pub reason: TargetParseError,
}

/// Result of reading a credentials source: the usable targets in file order
/// and one diagnostic per skipped line.
#[derive(Debug, Default)]
pub struct TargetList {
    pub targets: Vec<HostTarget>,
    pub rejected: Vec<RejectedLine>,
}

impl TargetList {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Reads targets from any buffered source. Blank lines are ignored.
pub fn parse_targets<R: BufRead>(reader: R) -> anyhow::Result<TargetList> {
    let mut list = TargetList::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match HostTarget::from_str(line) {
            Ok(target) => list.targets.push(target),
            Err(reason) => {
                warn!("Skipping line {}: {reason}", idx + 1);
                list.rejected.push(RejectedLine {
                    line_no: idx + 1,
                    reason,
                });
            }
        }
    }

    Ok(list)
}

/// Opens `path` and parses every target in it.
///
/// Failing to open the file is the only fatal condition.
pub fn load_targets(path: &Path) -> anyhow::Result<TargetList> {
    let file = File::open(path)
        .with_context(|| format!("failed to open targets file '{}'", path.display()))?;
    let list = parse_targets(BufReader::new(file))?;

    let len: usize = list.len();
    let unit: &str = if len == 1 { "target has been" } else { "targets have been" };
    success!("{len} {unit} parsed successfully");

    Ok(list)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
