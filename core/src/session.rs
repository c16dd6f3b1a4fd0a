//! Remote shell abstraction.
//!
//! The probe engine only needs to connect and run commands; these traits let it
//! work against real SSH as well as scripted sessions in tests.

use std::time::Duration;

use hostprobe_common::network::HostTarget;

use crate::error::ProbeError;

/// Deadlines applied to every blocking step of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP connect, SSH handshake and authentication.
    pub connect: Duration,
    /// Opening a channel, executing and reading a command.
    pub command: Duration,
}

/// Opens authenticated connections to targets.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        target: &HostTarget,
        timeouts: &Timeouts,
    ) -> Result<Box<dyn RemoteShell>, ProbeError>;
}

/// An authenticated connection. Dropping it releases the connection.
pub trait RemoteShell: Send {
    /// Runs `command` in a fresh session and returns stdout and stderr combined.
    ///
    /// `timeout` bounds every blocking step of the command.
    ///
    /// Fails with [`ProbeError::Session`] if the session cannot be opened and
    /// with [`ProbeError::Command`] if the command cannot run or exits non-zero.
    /// The session is closed before returning, whatever the result.
    fn exec(&mut self, command: &str, timeout: Duration) -> Result<String, ProbeError>;
}
