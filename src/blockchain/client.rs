//! JSON-RPC ledger client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to the primary JSON-RPC endpoint plus optional failovers
//! - Query chain identity, pending nonces and gas price
//! - Relay signed transactions
//! - Bound every call with a deadline so a hung node cannot stall a run

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError, TransportResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::ledger::LedgerClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::DispatchConfig;
use crate::observability::metrics;
use crate::resilience::with_deadline;

type SharedProvider = Arc<dyn Provider + Send + Sync>;

const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";

/// Ledger client backed by alloy HTTP providers.
#[derive(Clone)]
pub struct RpcLedgerClient {
    /// Endpoint URL and provider, primary first.
    providers: Vec<(String, SharedProvider)>,
    /// Per-call deadline.
    timeout_duration: Duration,
}

impl RpcLedgerClient {
    /// Create a client for the configured endpoints.
    ///
    /// No request is made here; connectivity is established lazily.
    pub fn new(config: &DispatchConfig) -> BlockchainResult<Self> {
        let mut providers = Vec::with_capacity(1 + config.failover_urls.len());

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push((
            config.rpc_url.clone(),
            Arc::new(ProviderBuilder::new().connect_http(primary_url)) as SharedProvider,
        ));

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push((
                    url_str.clone(),
                    Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider,
                )),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::debug!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            timeout_secs = config.rpc_timeout_secs,
            "RPC ledger client created"
        );

        Ok(Self {
            providers,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Number of configured endpoints (primary + failovers).
    pub fn endpoint_count(&self) -> usize {
        self.providers.len()
    }

    /// Run `call` against each endpoint in turn until one answers.
    ///
    /// A JSON-RPC error response from `submit` is final: the node saw the
    /// transaction and refused it.
    async fn call<T, F, Fut>(&self, method: &'static str, call: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = None;

        for (i, (url, provider)) in self.providers.iter().enumerate() {
            match with_deadline(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_request(method, true);
                    return Ok(result);
                }
                Ok(Err(RpcError::ErrorResp(payload))) if method == SEND_RAW_TRANSACTION => {
                    metrics::record_rpc_request(method, false);
                    return Err(BlockchainError::Rejected(payload.message.to_string()));
                }
                Ok(Err(e)) => {
                    metrics::record_rpc_request(method, false);
                    tracing::warn!(
                        provider_idx = i,
                        url = %url,
                        method,
                        error = %e,
                        "RPC error, trying next provider"
                    );
                    last_error = Some(BlockchainError::Rpc(e.to_string()));
                }
                Err(_) => {
                    metrics::record_rpc_request(method, false);
                    tracing::warn!(
                        provider_idx = i,
                        url = %url,
                        method,
                        "RPC timeout, trying next provider"
                    );
                    last_error = Some(BlockchainError::Timeout(self.timeout_duration.as_secs()));
                }
            }
        }

        Err(match last_error {
            Some(BlockchainError::Rpc(detail)) => {
                BlockchainError::Rpc(format!("All RPC providers failed ({method}): {detail}"))
            }
            Some(other) => other,
            None => BlockchainError::Rpc("No RPC providers configured".to_string()),
        })
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn network_identity(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.call("eth_getTransactionCount", move |p| async move {
            p.get_transaction_count(address).pending().await
        })
        .await
    }

    async fn suggested_gas_price(&self) -> BlockchainResult<U256> {
        self.call("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
            .map(U256::from)
    }

    async fn submit(&self, raw_tx: Bytes) -> BlockchainResult<TxHash> {
        self.call(SEND_RAW_TRANSACTION, |p| {
            let raw_tx = raw_tx.clone();
            async move {
                let pending = p.send_raw_transaction(&raw_tx).await?;
                Ok::<_, TransportError>(*pending.tx_hash())
            }
        })
        .await
    }
}

impl std::fmt::Debug for RpcLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let urls: Vec<&str> = self.providers.iter().map(|(url, _)| url.as_str()).collect();
        f.debug_struct("RpcLedgerClient")
            .field("endpoints", &urls)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DispatchConfig {
        DispatchConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = RpcLedgerClient::new(&test_config()).unwrap();
        assert_eq!(client.endpoint_count(), 1);
    }

    #[test]
    fn test_invalid_failover_is_skipped() {
        let mut config = test_config();
        config.failover_urls = vec!["not a url".to_string(), "http://127.0.0.1:2".to_string()];
        let client = RpcLedgerClient::new(&config).unwrap();
        assert_eq!(client.endpoint_count(), 2);
    }

    #[test]
    fn test_invalid_primary_url() {
        let mut config = test_config();
        config.rpc_url = "::bad::".to_string();
        let err = RpcLedgerClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_rpc_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        let client = RpcLedgerClient::new(&config).unwrap();

        // Nothing listens on either port.
        let result = client.network_identity().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("All RPC providers failed"));
    }
}
