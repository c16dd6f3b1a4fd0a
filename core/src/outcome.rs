use crate::classifier::OsIdentity;
use crate::error::ProbeError;

/// What one probe learned about its host.
///
/// An identity only exists on success, so the two cases are separate variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Success { identity: OsIdentity, detail: String },
    Failure { error: String },
}

/// The single result produced for every [`HostTarget`](hostprobe_common::network::HostTarget).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// `host:port` of the probed target.
    pub address: String,
    pub status: ProbeStatus,
}

impl ProbeOutcome {
    pub fn success(address: impl Into<String>, identity: OsIdentity, detail: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: ProbeStatus::Success {
                identity,
                detail: detail.into(),
            },
        }
    }

    pub fn failure(address: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: ProbeStatus::Failure {
                error: error.into(),
            },
        }
    }

    pub fn from_error(address: impl Into<String>, error: &ProbeError) -> Self {
        Self::failure(address, error.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ProbeStatus::Success { .. })
    }

    pub fn identity(&self) -> Option<OsIdentity> {
        match &self.status {
            ProbeStatus::Success { identity, .. } => Some(*identity),
            ProbeStatus::Failure { .. } => None,
        }
    }

    /// Version information on success, the error message on failure.
    pub fn detail(&self) -> &str {
        match &self.status {
            ProbeStatus::Success { detail, .. } => detail,
            ProbeStatus::Failure { error } => error,
        }
    }
}
