//! SSH transport backed by libssh2.
//!
//! Host keys are never checked: this is an inventory tool, any key is accepted.
//! Every call here blocks; the probe engine runs it on tokio's blocking pool.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use hostprobe_common::network::HostTarget;
use ssh2::{ErrorCode, ExtendedData, Session};
use tracing::debug;

use crate::error::ProbeError;
use crate::session::{Connector, RemoteShell, Timeouts};

/// libssh2 returns this code when `Session::set_timeout` expires.
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;

/// Password-authenticated SSH connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshConnector;

impl Connector for SshConnector {
    fn connect(
        &self,
        target: &HostTarget,
        timeouts: &Timeouts,
    ) -> Result<Box<dyn RemoteShell>, ProbeError> {
        let address = target.address();
        let tcp = connect_tcp(&target.host, target.port, timeouts.connect)?;

        tcp.set_read_timeout(Some(timeouts.command.max(timeouts.connect)))
            .map_err(|e| ProbeError::Connection(format!("failed to configure socket: {e}")))?;
        tcp.set_write_timeout(Some(timeouts.command.max(timeouts.connect)))
            .map_err(|e| ProbeError::Connection(format!("failed to configure socket: {e}")))?;

        let mut session = Session::new()
            .map_err(|e| ProbeError::Connection(format!("SSH session init failed: {e}")))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(as_millis(timeouts.connect));

        session
            .handshake()
            .map_err(|e| ssh_error("handshake", timeouts.connect, e, ProbeError::Connection))?;

        session
            .userauth_password(&target.username, &target.password)
            .map_err(|e| ssh_error("authentication", timeouts.connect, e, ProbeError::Connection))?;
        if !session.authenticated() {
            return Err(ProbeError::Connection(format!(
                "authentication rejected for user '{}'",
                target.username
            )));
        }

        debug!("Authenticated to {address} as '{}'", target.username);

        Ok(Box::new(SshShell { session }))
    }
}

struct SshShell {
    session: Session,
}

impl RemoteShell for SshShell {
    fn exec(&mut self, command: &str, timeout: Duration) -> Result<String, ProbeError> {
        self.session.set_timeout(as_millis(timeout));
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| ssh_error("session open", timeout, e, ProbeError::Session))?;

        let result: Result<String, ProbeError> = (|| {
            channel
                .handle_extended_data(ExtendedData::Merge)
                .map_err(|e| ssh_error("command", timeout, e, ProbeError::Command))?;
            channel
                .exec(command)
                .map_err(|e| ssh_error("command", timeout, e, ProbeError::Command))?;

            let mut raw = Vec::new();
            channel
                .read_to_end(&mut raw)
                .map_err(|e| io_error("command output", timeout, e))?;
            Ok(String::from_utf8_lossy(&raw).into_owned())
        })();

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let _ = channel.close();
                return Err(e);
            }
        };
        // The exit status is only known once the remote side has closed.
        channel
            .wait_close()
            .map_err(|e| ssh_error("command", timeout, e, ProbeError::Command))?;

        let status = channel
            .exit_status()
            .map_err(|e| ssh_error("command", timeout, e, ProbeError::Command))?;
        if status != 0 {
            return Err(ProbeError::Command(format!(
                "remote command exited with status {status}"
            )));
        }

        Ok(output)
    }
}

impl Drop for SshShell {
    fn drop(&mut self) {
        let _ = self.session.disconnect(None, "probe finished", None);
    }
}

/// Tries every resolved address until one accepts within `timeout`.
fn connect_tcp(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, ProbeError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| ProbeError::Connection(format!("failed to resolve {host}:{port}: {e}")))?
        .collect();

    let mut last_error: Option<ProbeError> = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(io_connect_error(&addr, timeout, e)),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ProbeError::Connection(format!("no address found for {host}:{port}"))
    }))
}

fn io_connect_error(addr: &SocketAddr, timeout: Duration, e: io::Error) -> ProbeError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeError::Timeout {
            stage: "connect",
            after: timeout,
        },
        _ => ProbeError::Connection(format!("dial tcp {addr}: {e}")),
    }
}

fn io_error(stage: &'static str, timeout: Duration, e: io::Error) -> ProbeError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeError::Timeout {
            stage,
            after: timeout,
        },
        _ => ProbeError::Command(format!("reading {stage} failed: {e}")),
    }
}

fn ssh_error(
    stage: &'static str,
    timeout: Duration,
    e: ssh2::Error,
    kind: fn(String) -> ProbeError,
) -> ProbeError {
    if matches!(e.code(), ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT)) {
        return ProbeError::Timeout {
            stage,
            after: timeout,
        };
    }
    kind(format!("ssh {stage} failed: {e}"))
}

fn as_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
