//! Concurrent multi-account dispatcher.
//!
//! # Concurrency
//! ```text
//! coordinator task
//!     ├─ spawn worker 0 ── resolve → build → sign → submit ─┐
//!     ├─ (stagger)                                          │
//!     ├─ spawn worker 1 ── ...                              ├─▶ mpsc ─▶ aggregator
//!     └─ join all workers, then drop the last sender ───────┘
//! ```
//!
//! Every worker reports exactly one outcome. A worker that panics is
//! reported by the coordinator instead; a cancelled worker reports
//! `Cancelled`.

use alloy::primitives::TxHash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};

use crate::blockchain::ledger::LedgerClient;
use crate::blockchain::transaction::{sign_transaction, TransferTemplate, TxBuilder};
use crate::blockchain::wallet::Account;
use crate::config::DispatchConfig;
use crate::dispatch::outcome::{DispatchError, TransactionOutcome};
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics;

/// Scheduling knobs for a dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Delay between consecutive worker launches.
    pub launch_stagger: Duration,
    /// Maximum number of workers running the pipeline at once.
    pub max_concurrency: Option<usize>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            launch_stagger: Duration::from_millis(100),
            max_concurrency: None,
        }
    }
}

impl From<&DispatchConfig> for DispatchOptions {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            launch_stagger: Duration::from_millis(config.launch_stagger_ms),
            max_concurrency: config.max_concurrency,
        }
    }
}

/// State shared by every worker of one dispatch.
struct WorkerContext {
    ledger: Arc<dyn LedgerClient>,
    template: Arc<TransferTemplate>,
    permits: Option<Arc<Semaphore>>,
}

/// Fans one transfer per key out to concurrent workers.
pub struct Dispatcher {
    ledger: Arc<dyn LedgerClient>,
    template: Arc<TransferTemplate>,
    options: DispatchOptions,
    shutdown: Shutdown,
}

impl Dispatcher {
    /// Create a new dispatcher.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        template: TransferTemplate,
        options: DispatchOptions,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            ledger,
            template: Arc::new(template),
            options,
            shutdown,
        }
    }

    /// Launch one worker per key and return the outcome stream.
    ///
    /// The receiver yields outcomes in completion order and closes once
    /// every worker has finished, so draining it yields exactly
    /// `keys.len()` items.
    pub fn dispatch(&self, keys: Vec<String>) -> mpsc::Receiver<TransactionOutcome> {
        let (tx, rx) = mpsc::channel(keys.len().max(1));

        let context = Arc::new(WorkerContext {
            ledger: self.ledger.clone(),
            template: self.template.clone(),
            permits: self
                .options
                .max_concurrency
                .map(|limit| Arc::new(Semaphore::new(limit))),
        });
        let stagger = self.options.launch_stagger;
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let total = keys.len();
            let mut workers = Vec::with_capacity(total);
            let mut signal = shutdown.subscribe();

            tracing::info!(accounts = total, "Dispatching transactions");

            for (key_index, key) in keys.into_iter().enumerate() {
                if key_index > 0 && !stagger.is_zero() && !signal.is_triggered() {
                    tokio::select! {
                        _ = tokio::time::sleep(stagger) => {}
                        _ = signal.recv() => {}
                    }
                }

                let worker = run_worker(
                    context.clone(),
                    shutdown.subscribe(),
                    key_index,
                    key,
                    tx.clone(),
                );
                workers.push((key_index, tokio::spawn(worker)));
            }

            for (key_index, handle) in workers {
                if let Err(e) = handle.await {
                    tracing::error!(key_index, error = %e, "Worker terminated without reporting");
                    metrics::record_transaction_outcome("failure", "worker_panicked");
                    let outcome = TransactionOutcome::Failure {
                        key_index,
                        address: None,
                        error: DispatchError::WorkerPanicked(e.to_string()),
                    };
                    if tx.send(outcome).await.is_err() {
                        tracing::error!(
                            key_index,
                            "Outcome receiver dropped before panic was reported"
                        );
                    }
                }
            }

            metrics::record_dispatch_duration(started.elapsed());
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "All workers finished"
            );
            // Dropping the last sender closes the outcome channel.
        });

        rx
    }
}

/// Worker body: run the pipeline for one key and report its outcome.
async fn run_worker(
    context: Arc<WorkerContext>,
    mut signal: ShutdownSignal,
    key_index: usize,
    key: String,
    results: mpsc::Sender<TransactionOutcome>,
) {
    let outcome = tokio::select! {
        biased;
        _ = signal.recv() => {
            let address = Account::from_private_key(&key).ok().map(|a| a.address());
            TransactionOutcome::Failure { key_index, address, error: DispatchError::Cancelled }
        }
        outcome = process_key(&context, key_index, &key) => outcome,
    };

    match &outcome {
        TransactionOutcome::Success { address, tx_hash, .. } => {
            tracing::info!(
                worker = key_index + 1,
                address = %address,
                tx_hash = %tx_hash,
                "Transaction sent"
            );
            metrics::record_transaction_outcome("success", "submitted");
        }
        TransactionOutcome::Failure { address, error, .. } => {
            tracing::warn!(
                worker = key_index + 1,
                address = ?address,
                error = %error,
                "Transaction failed"
            );
            metrics::record_transaction_outcome("failure", error.kind());
        }
    }

    if results.send(outcome).await.is_err() {
        tracing::error!(key_index, "Outcome receiver dropped before worker reported");
    }
}

/// The per-account pipeline: resolve → build → sign → submit.
async fn process_key(context: &WorkerContext, key_index: usize, key: &str) -> TransactionOutcome {
    let account = match Account::from_private_key(key) {
        Ok(account) => account,
        Err(e) => {
            return TransactionOutcome::Failure {
                key_index,
                address: None,
                error: e.into(),
            }
        }
    };
    let address = account.address();

    let _permit = match &context.permits {
        Some(permits) => permits.clone().acquire_owned().await.ok(),
        None => None,
    };

    match send_from(context, &account).await {
        Ok(tx_hash) => TransactionOutcome::Success {
            key_index,
            address,
            tx_hash,
        },
        Err(error) => TransactionOutcome::Failure {
            key_index,
            address: Some(address),
            error,
        },
    }
}

async fn send_from(context: &WorkerContext, account: &Account) -> Result<TxHash, DispatchError> {
    let ledger = context.ledger.as_ref();
    let template = context.template.as_ref();

    let unsigned = TxBuilder::new(ledger, template).build(account).await?;
    let signed = sign_transaction(unsigned, template.chain_id, account)?;
    let tx_hash = signed.hash();

    let reported = ledger
        .submit(signed.encoded())
        .await
        .map_err(DispatchError::SubmitFailed)?;
    if reported != tx_hash {
        tracing::warn!(
            local = %tx_hash,
            node = %reported,
            "Node reported a different transaction hash"
        );
    }

    Ok(tx_hash)
}
