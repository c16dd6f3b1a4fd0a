#![cfg(test)]
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use hostprobe_common::network::target::{load_targets, TargetParseError};
use hostprobe_common::network::HostTarget;
use hostprobe_core::classifier::{FORTIGATE_PLACEHOLDER, FORTIGATE_STATUS_COMMAND, UNAME_COMMAND};
use hostprobe_core::{
    dispatch, Connector, HeuristicClassifier, OsIdentity, ProbeError, ProbeSettings, Prober,
    RemoteShell, Timeouts,
};

/// Answers commands from a fixed table per host name.
struct Fleet {
    hosts: HashMap<String, HashMap<&'static str, &'static str>>,
}

impl Fleet {
    fn new() -> Self {
        Self { hosts: HashMap::new() }
    }

    fn host(mut self, name: &str, answers: &[(&'static str, &'static str)]) -> Self {
        self.hosts
            .insert(name.to_string(), answers.iter().copied().collect());
        self
    }
}

impl Connector for Fleet {
    fn connect(
        &self,
        target: &HostTarget,
        _timeouts: &Timeouts,
    ) -> Result<Box<dyn RemoteShell>, ProbeError> {
        if target.password != "secret" {
            return Err(ProbeError::Connection("authentication failed".to_string()));
        }
        match self.hosts.get(&target.host) {
            Some(answers) => Ok(Box::new(FleetShell(answers.clone()))),
            None => Err(ProbeError::Connection(format!(
                "dial tcp {}: connection refused",
                target.address()
            ))),
        }
    }
}

struct FleetShell(HashMap<&'static str, &'static str>);

impl RemoteShell for FleetShell {
    fn exec(&mut self, command: &str, _timeout: Duration) -> Result<String, ProbeError> {
        self.0
            .get(command)
            .map(|out| out.to_string())
            .ok_or_else(|| ProbeError::Command("remote command exited with status 127".into()))
    }
}

fn prober(fleet: Fleet) -> Prober {
    Prober::new(
        Arc::new(fleet),
        Arc::new(HeuristicClassifier),
        ProbeSettings::new(Duration::from_secs(1), Duration::from_secs(1)),
    )
}

#[tokio::test]
async fn credentials_file_to_summary() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "web01:22@root:secret").unwrap();
    writeln!(file, "not-a-valid-line").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "fw01:22@admin:secret").unwrap();
    writeln!(file, "fw02:22@admin:secret").unwrap();
    writeln!(file, "db01:2222@root:wrong").unwrap();
    writeln!(file, "gone:22@root:secret").unwrap();

    let list = load_targets(file.path()).unwrap();
    assert_eq!(list.len(), 5);
    assert_eq!(list.rejected.len(), 1);
    assert_eq!(list.rejected[0].line_no, 2);
    assert!(matches!(list.rejected[0].reason, TargetParseError::MissingSeparator(_)));

    let fleet = Fleet::new()
        .host("web01", &[(UNAME_COMMAND, "Linux web01 5.15.0-91-generic #101-Ubuntu SMP x86_64\n")])
        .host(
            "fw01",
            &[
                (UNAME_COMMAND, "Unknown action 0\n"),
                (FORTIGATE_STATUS_COMMAND, "Version: FortiGate-60F v7.2.5,build1517\nPlatform: FortiGate-60F\n"),
            ],
        )
        .host("fw02", &[(FORTIGATE_STATUS_COMMAND, "")]);

    let mut progress = Vec::new();
    let summary = dispatch(list.targets, &prober(fleet), Some(2), |outcome, p| {
        progress.push((outcome.address.clone(), p.done))
    })
    .await;

    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded + summary.failed, summary.total);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(progress.len(), 5);
    assert_eq!(progress.last().map(|(_, done)| *done), Some(5));

    let by_address: HashMap<&str, _> = summary
        .outcomes
        .iter()
        .map(|o| (o.address.as_str(), o))
        .collect();

    assert_eq!(by_address["web01:22"].identity(), Some(OsIdentity::Ubuntu));

    let fw01 = by_address["fw01:22"];
    assert_eq!(fw01.identity(), Some(OsIdentity::FortiOs));
    assert_eq!(fw01.detail(), "FortiOS FortiGate-60F v7.2.5");

    // Primary command fails and the appliance command returns nothing.
    assert!(!by_address["fw02:22"].is_success());
    assert!(!by_address["db01:2222"].is_success());
    assert!(by_address["gone:22"].detail().contains("connection refused"));

    assert!(summary.outcomes.iter().all(|o| o.detail() != FORTIGATE_PLACEHOLDER));
}
