//! Configuration schema definitions.
//!
//! This module defines the configuration structure for a dispatch run.
//! All types derive Serde traits for deserialization from TOML or JSON files.

use serde::{Deserialize, Serialize};

/// Root configuration for a multi-account dispatch run.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Hex-encoded private keys, one transfer per key.
    pub private_keys: Vec<String>,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order after the primary.
    pub failover_urls: Vec<String>,

    /// Chain ID signatures are bound to (e.g., 56 for BSC mainnet, 31337 for
    /// local Anvil). Required; 0 means unset.
    pub chain_id: u64,

    /// Destination address for every transfer.
    pub to_address: String,

    /// Transfer value in wei (decimal). Empty means zero.
    pub value: String,

    /// Gas limit per transaction.
    pub gas_limit: u64,

    /// Gas price in wei (decimal). Empty or absent queries the network.
    pub gas_price: Option<String>,

    /// Hex-encoded call data (optional).
    pub data: Option<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Delay between worker launches in milliseconds (0 disables).
    pub launch_stagger_ms: u64,

    /// Maximum number of workers in flight. Unlimited when absent.
    pub max_concurrency: Option<usize>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            private_keys: Vec::new(),
            rpc_url: String::new(),
            failover_urls: Vec::new(),
            chain_id: 0,
            to_address: String::new(),
            value: String::new(),
            gas_limit: 21_000,
            gas_price: None,
            data: None,
            rpc_timeout_secs: 10,
            launch_stagger_ms: 100,
            max_concurrency: None,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Configured gas price override, treating an empty string as absent.
    pub fn gas_price_override(&self) -> Option<&str> {
        self.gas_price.as_deref().filter(|s| !s.is_empty())
    }

    /// Configured call data, treating an empty string as absent.
    pub fn call_data(&self) -> Option<&str> {
        self.data.as_deref().filter(|s| !s.is_empty())
    }
}

// Keys are never printed.
impl std::fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("private_keys", &format_args!("[{} redacted]", self.private_keys.len()))
            .field("rpc_url", &self.rpc_url)
            .field("failover_urls", &self.failover_urls)
            .field("chain_id", &self.chain_id)
            .field("to_address", &self.to_address)
            .field("value", &self.value)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .field("data", &self.data)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("launch_stagger_ms", &self.launch_stagger_ms)
            .field("max_concurrency", &self.max_concurrency)
            .field("observability", &self.observability)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
