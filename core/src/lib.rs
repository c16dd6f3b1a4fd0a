//! # Hostprobe Core
//!
//! Identifies the operating system behind a list of SSH endpoints.
//!
//! * [`classifier`]: pure heuristics turning command output into an identity.
//! * [`probe`]: the per-host protocol (connect, `uname -a`, appliance fallback).
//! * [`dispatch`]: concurrent fan-out and collection of outcomes.
//! * [`network`]: the libssh2-backed transport.

pub mod classifier;
pub mod dispatch;
pub mod error;
pub mod network;
pub mod outcome;
pub mod probe;
pub mod session;
pub mod summary;

#[cfg(test)]
pub mod mock_session;

pub use classifier::{Classifier, HeuristicClassifier, OsIdentity};
pub use dispatch::{Progress, dispatch, perform_probes};
pub use error::ProbeError;
pub use outcome::{ProbeOutcome, ProbeStatus};
pub use probe::{ProbeSettings, Prober};
pub use session::{Connector, RemoteShell, Timeouts};
pub use summary::{Aggregator, RunSummary};
