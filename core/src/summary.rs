//! Collects probe outcomes and derives the run statistics.

use std::time::Duration;

use crate::outcome::ProbeOutcome;

/// Totals for a finished run, plus every outcome in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
    pub outcomes: Vec<ProbeOutcome>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: Vec<ProbeOutcome>, elapsed: Duration) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            elapsed,
            outcomes,
        }
    }
}

/// Accepts outcomes in any order until the expected count has arrived.
#[derive(Debug)]
pub struct Aggregator {
    expected: usize,
    outcomes: Vec<ProbeOutcome>,
}

impl Aggregator {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            outcomes: Vec::with_capacity(expected),
        }
    }

    pub fn push(&mut self, outcome: ProbeOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn received(&self) -> usize {
        self.outcomes.len()
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.len() >= self.expected
    }

    /// `total` is the number of targets submitted, so a short count stays visible
    /// as `succeeded + failed < total`.
    pub fn finish(self, elapsed: Duration) -> RunSummary {
        let expected = self.expected();
        RunSummary {
            total: expected,
            ..RunSummary::from_outcomes(self.outcomes, elapsed)
        }
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
