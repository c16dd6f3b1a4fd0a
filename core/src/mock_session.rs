//! Scripted remote sessions for testing the probe engine without servers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hostprobe_common::network::HostTarget;

use crate::error::ProbeError;
use crate::session::{Connector, RemoteShell, Timeouts};

/// How a single simulated host behaves.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    connect_error: Option<ProbeError>,
    responses: HashMap<String, Result<String, ProbeError>>,
    delay: Option<Duration>,
    exec_delay: Option<Duration>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that cannot be connected to.
    pub fn unreachable(error: ProbeError) -> Self {
        Self {
            connect_error: Some(error),
            ..Self::default()
        }
    }

    pub fn answer(mut self, command: &str, output: &str) -> Self {
        self.responses
            .insert(command.to_string(), Ok(output.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, error: ProbeError) -> Self {
        self.responses.insert(command.to_string(), Err(error));
        self
    }

    /// Sleeps before connecting, to shuffle completion order.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sleeps inside every command, ignoring the timeout it is given.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.exec_delay = Some(delay);
        self
    }
}

/// Connector keyed by target host name.
#[derive(Debug, Default)]
pub struct MockConnector {
    hosts: HashMap<String, ScriptedHost>,
    open: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: &str, script: ScriptedHost) -> Self {
        self.hosts.insert(host.to_string(), script);
        self
    }

    /// Connections handed out and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Most connections that were ever open at the same time.
    pub fn peak_connections(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// `(host, command)` pairs in execution order.
    pub fn executed(&self) -> Vec<(String, String)> {
        self.executed.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

impl Connector for MockConnector {
    fn connect(
        &self,
        target: &HostTarget,
        _timeouts: &Timeouts,
    ) -> Result<Box<dyn RemoteShell>, ProbeError> {
        let script = self.hosts.get(&target.host).cloned().ok_or_else(|| {
            ProbeError::Connection(format!("dial tcp {}: no route to host", target.address()))
        })?;

        if let Some(delay) = script.delay {
            std::thread::sleep(delay);
        }
        if let Some(error) = script.connect_error {
            return Err(error);
        }

        let now = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Ok(Box::new(MockShell {
            host: target.host.clone(),
            responses: script.responses,
            exec_delay: script.exec_delay,
            open: self.open.clone(),
            executed: self.executed.clone(),
        }))
    }
}

struct MockShell {
    host: String,
    responses: HashMap<String, Result<String, ProbeError>>,
    exec_delay: Option<Duration>,
    open: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<(String, String)>>>,
}

impl RemoteShell for MockShell {
    fn exec(&mut self, command: &str, _timeout: Duration) -> Result<String, ProbeError> {
        if let Ok(mut log) = self.executed.lock() {
            log.push((self.host.clone(), command.to_string()));
        }
        if let Some(delay) = self.exec_delay {
            std::thread::sleep(delay);
        }
        self.responses.get(command).cloned().unwrap_or_else(|| {
            Err(ProbeError::Command(
                "remote command exited with status 127".to_string(),
            ))
        })
    }
}

impl Drop for MockShell {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
