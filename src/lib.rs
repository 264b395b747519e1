//! Concurrent multi-account transfer dispatcher for EVM chains.
//!
//! One transaction per private key, all to the same destination, resolved,
//! signed and broadcast concurrently through a JSON-RPC node.

pub mod blockchain;
pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use blockchain::{LedgerClient, RpcLedgerClient};
pub use config::DispatchConfig;
pub use dispatch::{Dispatcher, ResultAggregator, SummaryReport, TransactionOutcome};
pub use lifecycle::Shutdown;
