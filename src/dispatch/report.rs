//! Result aggregation and the human-readable report.

use std::io::Write;
use tokio::sync::mpsc;

use crate::dispatch::outcome::TransactionOutcome;

/// Counts derived from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryReport {
    pub successes: usize,
    pub failures: usize,
}

impl SummaryReport {
    pub fn total(&self) -> usize {
        self.successes + self.failures
    }

    fn record(&mut self, outcome: &TransactionOutcome) {
        if outcome.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }
}

/// Render one outcome as a report line.
pub fn format_outcome(outcome: &TransactionOutcome) -> String {
    match outcome {
        TransactionOutcome::Success { address, tx_hash, .. } => {
            format!("✅ {}: success - tx hash: {}", address, tx_hash)
        }
        TransactionOutcome::Failure {
            address: Some(address),
            error,
            ..
        } => format!("❌ {}: failed - {}", address, error),
        TransactionOutcome::Failure {
            key_index,
            address: None,
            error,
        } => format!("❌ key #{} (unresolved): failed - {}", key_index + 1, error),
    }
}

/// Drains the outcome stream into a report sink.
pub struct ResultAggregator<W> {
    out: W,
    expected: usize,
}

impl<W: Write> ResultAggregator<W> {
    /// `expected` is the number of configured keys.
    pub fn new(out: W, expected: usize) -> Self {
        Self { out, expected }
    }

    /// Consume outcomes until every worker is done, printing each as it
    /// arrives, then print the summary.
    pub async fn collect(
        mut self,
        mut outcomes: mpsc::Receiver<TransactionOutcome>,
    ) -> std::io::Result<SummaryReport> {
        let mut summary = SummaryReport::default();

        writeln!(self.out, "\n=== Transaction Results ===")?;
        while let Some(outcome) = outcomes.recv().await {
            summary.record(&outcome);
            writeln!(self.out, "{}", format_outcome(&outcome))?;
        }

        if summary.total() != self.expected {
            tracing::error!(
                expected = self.expected,
                received = summary.total(),
                "Outcome count does not match configured key count"
            );
        }
        debug_assert_eq!(summary.total(), self.expected, "one outcome per configured key");

        writeln!(self.out, "\n=== Summary ===")?;
        writeln!(self.out, "Succeeded: {}", summary.successes)?;
        writeln!(self.out, "Failed: {}", summary.failures)?;
        writeln!(self.out, "Total: {}", summary.total())?;
        self.out.flush()?;

        Ok(summary)
    }
}
