//! # Probe Engine
//!
//! Identifies the operating system of one host:
//!
//! 1. Connect and authenticate.
//! 2. Run the primary command (`uname -a`) and classify its trimmed output.
//! 3. If that command fails, or its output shows a FortiGate shell answering
//!    instead, run the appliance status command and read the firmware version.
//!
//! Every path ends in exactly one [`ProbeOutcome`], and the connection is
//! released before the outcome is returned. The overall deadline is enforced
//! on the probing thread itself: each step gets at most the time that is left.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hostprobe_common::config::Config;
use hostprobe_common::network::HostTarget;
use tracing::{debug, warn};

use crate::classifier::{self, Classifier, HeuristicClassifier, OsIdentity};
use crate::error::ProbeError;
use crate::network::SshConnector;
use crate::outcome::ProbeOutcome;
use crate::session::{Connector, RemoteShell, Timeouts};

/// Slack added on top of the per-step deadlines before a probe is abandoned.
const DEADLINE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub timeouts: Timeouts,
}

impl ProbeSettings {
    pub fn new(connect: Duration, command: Duration) -> Self {
        Self {
            timeouts: Timeouts { connect, command },
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.connect_timeout, cfg.command_timeout)
    }

    /// Longest a whole probe may take once it is running: connect plus up to
    /// two commands.
    pub fn deadline(&self) -> Duration {
        self.timeouts.connect + self.timeouts.command * 2 + DEADLINE_GRACE
    }
}

/// Time left for one probe, counted from when it starts running.
struct Budget {
    started: Instant,
    limit: Duration,
}

impl Budget {
    fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    fn remaining(&self) -> Result<Duration, ProbeError> {
        let left = self.limit.saturating_sub(self.started.elapsed());
        if left.is_zero() {
            return Err(ProbeError::Timeout {
                stage: "probe",
                after: self.limit,
            });
        }
        Ok(left)
    }
}

/// Runs the identification protocol against single targets.
///
/// Cheap to clone; every probe task gets its own copy.
#[derive(Clone)]
pub struct Prober {
    connector: Arc<dyn Connector>,
    classifier: Arc<dyn Classifier>,
    settings: ProbeSettings,
}

impl Prober {
    pub fn new(
        connector: Arc<dyn Connector>,
        classifier: Arc<dyn Classifier>,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            connector,
            classifier,
            settings,
        }
    }

    /// SSH transport with the substring classifier.
    pub fn ssh(settings: ProbeSettings) -> Self {
        Self::new(
            Arc::new(SshConnector),
            Arc::new(HeuristicClassifier),
            settings,
        )
    }

    /// Probes `target` on the blocking pool.
    ///
    /// Never fails: errors, panics and expired deadlines all become failed outcomes.
    pub async fn probe(&self, target: HostTarget) -> ProbeOutcome {
        self.probe_holding(target, ()).await
    }

    /// Like [`Prober::probe`], keeping `guard` alive on the probing thread until
    /// the connection has been released.
    pub async fn probe_holding<G>(&self, target: HostTarget, guard: G) -> ProbeOutcome
    where
        G: Send + 'static,
    {
        let address = target.address();
        let prober = self.clone();

        let task = tokio::task::spawn_blocking(move || {
            let outcome = prober.probe_blocking(&target);
            drop(guard);
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                ProbeOutcome::failure(address, format!("probe task failed: {join_error}"))
            }
        }
    }

    /// The whole protocol for one host, on the current thread.
    pub fn probe_blocking(&self, target: &HostTarget) -> ProbeOutcome {
        let address = target.address();
        let budget = Budget::start(self.settings.deadline());
        debug!("Connecting to {address}");

        let mut shell = match self.connector.connect(target, &self.settings.timeouts) {
            Ok(shell) => shell,
            Err(e) => {
                debug!("Connection to {address} failed: {e}");
                return ProbeOutcome::from_error(address, &e);
            }
        };

        let outcome = match self.identify(&address, shell.as_mut(), &budget) {
            Ok((identity, detail)) => ProbeOutcome::success(address, identity, detail),
            Err(e) => ProbeOutcome::from_error(address, &e),
        };

        drop(shell);
        outcome
    }

    fn identify(
        &self,
        address: &str,
        shell: &mut dyn RemoteShell,
        budget: &Budget,
    ) -> Result<(OsIdentity, String), ProbeError> {
        match self.run(shell, self.classifier.primary_command(), budget) {
            Ok(output) => {
                let trimmed = output.trim();

                if self.classifier.is_masquerade(trimmed) {
                    debug!("{address} answered like an appliance, asking for its status");
                    return Ok(self.appliance_fallback(shell, budget).unwrap_or_else(|e| {
                        warn!("{address} looks like an appliance but did not report a version: {e}");
                        (
                            self.classifier.appliance(),
                            self.classifier.appliance_placeholder().to_string(),
                        )
                    }));
                }

                Ok((
                    self.classifier.classify(trimmed),
                    classifier::truncate_detail(trimmed),
                ))
            }
            Err(primary) if primary.allows_fallback() => {
                debug!("{address}: primary command failed ({primary}), trying appliance status");
                self.appliance_fallback(shell, budget).map_err(|fallback| {
                    debug!("{address}: appliance status failed too ({fallback})");
                    primary
                })
            }
            Err(e) => Err(e),
        }
    }

    fn appliance_fallback(
        &self,
        shell: &mut dyn RemoteShell,
        budget: &Budget,
    ) -> Result<(OsIdentity, String), ProbeError> {
        let output = self.run(shell, self.classifier.fallback_command(), budget)?;
        if output.is_empty() {
            return Err(ProbeError::Command("empty status output".to_string()));
        }
        Ok((
            self.classifier.appliance(),
            self.classifier.describe_appliance(&output),
        ))
    }

    /// Runs one command within both the command timeout and what is left of
    /// the probe deadline.
    fn run(
        &self,
        shell: &mut dyn RemoteShell,
        command: &str,
        budget: &Budget,
    ) -> Result<String, ProbeError> {
        let timeout = budget.remaining()?.min(self.settings.timeouts.command);
        let output = shell.exec(command, timeout)?;
        budget.remaining()?;
        Ok(output)
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
