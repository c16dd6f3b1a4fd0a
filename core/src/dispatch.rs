//! # Dispatcher
//!
//! Fans a list of targets out to concurrent probes and drains their outcomes
//! through a channel sized for the whole run, in completion order.
//!
//! Every target is probed at once unless a concurrency limit is given, in which
//! case a semaphore gates how many probes hold a connection simultaneously.

use std::sync::Arc;
use std::time::Instant;

use hostprobe_common::config::Config;
use hostprobe_common::network::HostTarget;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error};

use crate::outcome::ProbeOutcome;
use crate::probe::{ProbeSettings, Prober};
use crate::summary::{Aggregator, RunSummary};

/// Position of the run when an outcome arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

/// Probes every target over SSH using the timeouts and limit from `cfg`.
pub async fn perform_probes<F>(targets: Vec<HostTarget>, cfg: &Config, on_outcome: F) -> RunSummary
where
    F: FnMut(&ProbeOutcome, Progress),
{
    let prober = Prober::ssh(ProbeSettings::from_config(cfg));
    dispatch(targets, &prober, cfg.concurrency, on_outcome).await
}

/// Spawns one probe task per target and returns once all of them reported.
///
/// `on_outcome` is called on the caller's task for each outcome as it arrives.
/// `limit` of `None` (or `Some(0)`) means no cap.
pub async fn dispatch<F>(
    targets: Vec<HostTarget>,
    prober: &Prober,
    limit: Option<usize>,
    mut on_outcome: F,
) -> RunSummary
where
    F: FnMut(&ProbeOutcome, Progress),
{
    let total: usize = targets.len();
    let start_time: Instant = Instant::now();
    let mut aggregator = Aggregator::new(total);

    if total == 0 {
        return aggregator.finish(start_time.elapsed());
    }

    let (tx, mut rx) = mpsc::channel::<ProbeOutcome>(total);
    let gate: Option<Arc<Semaphore>> = limit
        .filter(|n| *n > 0)
        .map(|n| Arc::new(Semaphore::new(n)));

    debug!(
        "Dispatching {total} probes ({})",
        limit.filter(|n| *n > 0).map_or("unbounded".to_string(), |n| format!("at most {n} at once"))
    );

    for target in targets {
        let tx = tx.clone();
        let prober = prober.clone();
        let gate = gate.clone();

        tokio::spawn(async move {
            // Released on the probing thread, after the connection is dropped.
            let permit = match gate {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            let outcome = prober.probe_holding(target, permit).await;
            let _ = tx.send(outcome).await;
        });
    }
    drop(tx);

    while let Some(outcome) = rx.recv().await {
        on_outcome(
            &outcome,
            Progress {
                done: aggregator.received() + 1,
                total,
            },
        );
        aggregator.push(outcome);
        if aggregator.is_complete() {
            break;
        }
    }

    if !aggregator.is_complete() {
        error!(
            "Only {} of {total} probes reported back",
            aggregator.received()
        );
    }

    aggregator.finish(start_time.elapsed())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
