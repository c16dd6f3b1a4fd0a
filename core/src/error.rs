use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while probing a single host.
///
/// None of these abort a run; each one becomes the detail of a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The host could not be reached, the handshake failed or the credentials were refused.
    #[error("{0}")]
    Connection(String),

    /// Connected, but no command channel could be opened.
    #[error("failed to open session: {0}")]
    Session(String),

    /// The remote command could not be run or exited unsuccessfully.
    #[error("failed to execute command: {0}")]
    Command(String),

    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },
}

impl ProbeError {
    /// Whether the appliance status command is worth trying after this error.
    ///
    /// Only a failed command qualifies; a dead session or an expired deadline
    /// would just fail again.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, ProbeError::Command(_))
    }
}
