//! The ledger boundary used by the dispatcher.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, ChainId};

/// Narrow query/submit interface to a remote EVM ledger.
///
/// Implementations are shared across all workers of a dispatch and must
/// tolerate concurrent calls without external locking.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Chain identity reported by the node.
    async fn network_identity(&self) -> BlockchainResult<ChainId>;

    /// Number of transactions sent or pending from `address`.
    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// Gas price suggested by the node, in wei.
    async fn suggested_gas_price(&self) -> BlockchainResult<U256>;

    /// Broadcast a signed, 2718-encoded transaction.
    async fn submit(&self, raw_tx: Bytes) -> BlockchainResult<TxHash>;
}

/// Result of comparing the configured chain with the node's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkCheck {
    Match(ChainId),
    Mismatch { expected: ChainId, actual: ChainId },
}

/// Query the node's chain identity and compare it with `expected`.
///
/// A transport failure is returned as an error (the run cannot start); a
/// mismatch is only logged.
pub async fn verify_network(
    ledger: &dyn LedgerClient,
    expected: ChainId,
) -> BlockchainResult<NetworkCheck> {
    let actual = ledger.network_identity().await?;
    if actual == expected {
        tracing::info!(chain_id = %actual, "Connected to network");
        Ok(NetworkCheck::Match(actual))
    } else {
        tracing::warn!(
            expected = %expected,
            actual = %actual,
            "Configured chain ID does not match the node, continuing"
        );
        Ok(NetworkCheck::Mismatch { expected, actual })
    }
}
