//! Metrics collection.
//!
//! # Metrics
//! - `multisend_rpc_requests_total` (counter): ledger calls by method, result
//! - `multisend_transactions_total` (counter): per-account outcomes by status, reason
//! - `multisend_dispatch_duration_seconds` (histogram): wall time of a run
//!
//! Recording is a no-op until the embedding process installs a recorder.

use std::time::Duration;

/// Record a single ledger RPC attempt.
pub fn record_rpc_request(method: &'static str, success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("multisend_rpc_requests_total", "method" => method, "result" => result)
        .increment(1);
}

/// Record the terminal outcome of one account.
pub fn record_transaction_outcome(status: &'static str, reason: &'static str) {
    metrics::counter!("multisend_transactions_total", "status" => status, "reason" => reason)
        .increment(1);
}

/// Record how long a complete dispatch took.
pub fn record_dispatch_duration(elapsed: Duration) {
    metrics::histogram!("multisend_dispatch_duration_seconds").record(elapsed.as_secs_f64());
}
