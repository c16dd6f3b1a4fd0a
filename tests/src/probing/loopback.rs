#![cfg(test)]
use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use hostprobe_common::config::Config;
use hostprobe_common::network::target::load_targets;
use hostprobe_common::network::HostTarget;
use hostprobe_core::{perform_probes, ProbeSettings, Prober};

fn quick_settings() -> ProbeSettings {
    ProbeSettings::new(Duration::from_secs(1), Duration::from_secs(1))
}

/// Port on loopback with nothing listening.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Accepts connections and holds them open without ever sending a byte.
fn silent_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let mut held: Vec<TcpStream> = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    port
}

#[tokio::test]
async fn refused_port_is_a_failure() {
    let prober = Prober::ssh(quick_settings());
    let outcome = prober
        .probe(HostTarget::new("127.0.0.1", closed_port(), "root", "pw"))
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.identity().is_none());
    assert!(!outcome.detail().is_empty());
}

#[tokio::test]
async fn silent_server_fails_within_deadline() {
    let settings = quick_settings();
    let prober = Prober::ssh(settings);
    let port = silent_listener();

    let started = Instant::now();
    let outcome = prober
        .probe(HostTarget::new("127.0.0.1", port, "root", "pw"))
        .await;

    assert!(!outcome.is_success());
    assert!(started.elapsed() <= settings.deadline() + Duration::from_secs(1));
}

#[tokio::test]
async fn whole_run_over_unreachable_fleet() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let ports = [closed_port(), closed_port(), silent_listener()];
    for port in ports {
        writeln!(file, "127.0.0.1:{port}@root:pw").unwrap();
    }
    writeln!(file, "127.0.0.1@root:pw").unwrap();

    let list = load_targets(file.path()).unwrap();
    assert_eq!(list.len(), 3);

    let cfg = Config {
        connect_timeout: Duration::from_secs(1),
        command_timeout: Duration::from_secs(1),
        concurrency: Some(2),
        ..Config::default()
    };

    let mut seen = 0;
    let summary = perform_probes(list.targets, &cfg, |_, _| seen += 1).await;

    assert_eq!(seen, 3);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.succeeded, 0);
}
