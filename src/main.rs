//! multisend: send one transfer per private key to a single destination.
//!
//! # Run Overview
//!
//! ```text
//!   config file ──▶ load + validate ──▶ RPC client ──▶ chain ID check
//!                                                          │
//!                           ┌──────────────────────────────┘
//!                           ▼
//!                     ┌───────────┐   worker per key (staggered)
//!                     │dispatcher │──▶ resolve → nonce/gas → sign → submit
//!                     └─────┬─────┘
//!                           ▼
//!                     ┌───────────┐
//!                     │aggregator │──▶ stdout: line per account + summary
//!                     └───────────┘
//! ```
//!
//! Configuration and connectivity failures abort before any worker starts.
//! Per-account failures never abort the run.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use evm_multisend::blockchain::transaction::TransferTemplate;
use evm_multisend::blockchain::{verify_network, ChainId, LedgerClient, RpcLedgerClient};
use evm_multisend::config::load_config;
use evm_multisend::dispatch::{DispatchOptions, Dispatcher, ResultAggregator};
use evm_multisend::lifecycle::{signals, Shutdown};
use evm_multisend::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "multisend")]
#[command(version)]
#[command(about = "Send one EVM transfer per private key, concurrently", long_about = None)]
struct Cli {
    /// Path to the configuration file (.toml or .json)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log level or filter directive (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(cli.log_level.as_deref().unwrap_or("info"));
            tracing::error!(path = ?cli.config, error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init_logging(&level);

    tracing::info!(
        path = ?cli.config,
        accounts = config.private_keys.len(),
        rpc_url = %config.rpc_url,
        chain_id = config.chain_id,
        "Configuration loaded"
    );

    let template = TransferTemplate::from_config(&config)?;
    let ledger: Arc<dyn LedgerClient> = Arc::new(RpcLedgerClient::new(&config)?);

    if let Err(e) = verify_network(ledger.as_ref(), ChainId(config.chain_id)).await {
        tracing::error!(error = %e, "Failed to query chain ID");
        return Err(e.into());
    }

    let shutdown = Shutdown::new();
    let _signals = signals::spawn_ctrl_c_handler(shutdown.clone());

    let keys = config.private_keys.clone();
    let expected = keys.len();
    println!("Sending {} transactions...", expected);

    let dispatcher = Dispatcher::new(ledger, template, DispatchOptions::from(&config), shutdown);
    let outcomes = dispatcher.dispatch(keys);

    let summary = ResultAggregator::new(std::io::stdout().lock(), expected)
        .collect(outcomes)
        .await?;

    tracing::info!(
        succeeded = summary.successes,
        failed = summary.failures,
        total = summary.total(),
        "Dispatch complete"
    );
    Ok(())
}
