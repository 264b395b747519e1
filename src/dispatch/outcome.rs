//! Per-account outcomes and the failure taxonomy.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::blockchain::wallet::InvalidKey;

/// Why one account's pipeline stopped.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The secret is not a valid private key.
    #[error("{0}")]
    InvalidKey(#[from] InvalidKey),

    #[error("nonce query failed for {address}: {source}")]
    NonceQueryFailed {
        address: Address,
        #[source]
        source: BlockchainError,
    },

    #[error("gas price query failed for {address}: {source}")]
    GasPriceQueryFailed {
        address: Address,
        #[source]
        source: BlockchainError,
    },

    #[error("invalid transfer amount '{0}'")]
    InvalidAmount(String),

    #[error("invalid gas price '{0}'")]
    InvalidGasPrice(String),

    #[error("invalid call data: {0}")]
    InvalidData(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("submit failed: {0}")]
    SubmitFailed(#[source] BlockchainError),

    /// The run was cancelled before this account finished.
    #[error("cancelled before completion")]
    Cancelled,

    /// The worker task died without reporting.
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
}

impl DispatchError {
    /// Stable, low-cardinality label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::InvalidKey(_) => "invalid_key",
            DispatchError::NonceQueryFailed { .. } => "nonce_query_failed",
            DispatchError::GasPriceQueryFailed { .. } => "gas_price_query_failed",
            DispatchError::InvalidAmount(_) => "invalid_amount",
            DispatchError::InvalidGasPrice(_) => "invalid_gas_price",
            DispatchError::InvalidData(_) => "invalid_data",
            DispatchError::SigningFailed(_) => "signing_failed",
            DispatchError::SubmitFailed(_) => "submit_failed",
            DispatchError::Cancelled => "cancelled",
            DispatchError::WorkerPanicked(_) => "worker_panicked",
        }
    }
}

/// Terminal result of one configured key.
#[derive(Debug, Clone)]
pub enum TransactionOutcome {
    Success {
        /// Position of the key in the configured list.
        key_index: usize,
        address: Address,
        tx_hash: TxHash,
    },
    Failure {
        /// Position of the key in the configured list.
        key_index: usize,
        /// Empty when the key never resolved to an address.
        address: Option<Address>,
        error: DispatchError,
    },
}

impl TransactionOutcome {
    pub fn key_index(&self) -> usize {
        match self {
            TransactionOutcome::Success { key_index, .. }
            | TransactionOutcome::Failure { key_index, .. } => *key_index,
        }
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            TransactionOutcome::Success { address, .. } => Some(*address),
            TransactionOutcome::Failure { address, .. } => *address,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransactionOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            TransactionOutcome::Success { .. } => None,
            TransactionOutcome::Failure { error, .. } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DispatchError::NonceQueryFailed {
            address: Address::ZERO,
            source: BlockchainError::Timeout(10),
        };
        assert!(err.to_string().contains("nonce query failed"));
        assert!(err.to_string().contains("RPC timeout after 10 seconds"));
        assert_eq!(err.kind(), "nonce_query_failed");

        let err = DispatchError::from(InvalidKey("odd number of digits".into()));
        assert_eq!(err.to_string(), "invalid private key: odd number of digits");
        assert_eq!(err.kind(), "invalid_key");
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = TransactionOutcome::Success {
            key_index: 0,
            address: Address::ZERO,
            tx_hash: TxHash::ZERO,
        };
        assert!(ok.is_success());
        assert!(ok.error().is_none());
        assert_eq!(ok.address(), Some(Address::ZERO));

        let failed = TransactionOutcome::Failure {
            key_index: 3,
            address: None,
            error: DispatchError::Cancelled,
        };
        assert!(!failed.is_success());
        assert_eq!(failed.key_index(), 3);
        assert!(failed.address().is_none());
        assert_eq!(failed.error().map(DispatchError::kind), Some("cancelled"));
    }
}
