//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Private key (config)
//!     → wallet.rs (account resolution)
//!     → transaction.rs (build from ledger state, sign with EIP-155)
//!     → ledger.rs / client.rs (JSON-RPC with deadlines and failover)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod ledger;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::RpcLedgerClient;
pub use ledger::{verify_network, LedgerClient, NetworkCheck};
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::Account;
