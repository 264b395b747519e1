//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required fields: key list, RPC URL, chain ID, destination address
//! - Validate value ranges (timeouts > 0, concurrency cap > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Transfer literals (value, gas price, data) are NOT checked here; they are
//!   parsed per account so that a malformed literal surfaces as a per-account
//!   failure rather than aborting the run

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::DispatchConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("private key list must not be empty")]
    NoPrivateKeys,

    #[error("rpc_url must not be empty")]
    EmptyRpcUrl,

    #[error("invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("chain_id must be set to a non-zero value")]
    MissingChainId,

    #[error("to_address must not be empty")]
    EmptyDestination,

    #[error("invalid to_address '{0}'")]
    InvalidDestination(String),

    #[error("rpc_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("max_concurrency must be greater than zero")]
    ZeroConcurrency,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.private_keys.is_empty() {
        errors.push(ValidationError::NoPrivateKeys);
    }

    if config.rpc_url.trim().is_empty() {
        errors.push(ValidationError::EmptyRpcUrl);
    } else if let Err(e) = config.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::InvalidRpcUrl {
            url: config.rpc_url.clone(),
            reason: e.to_string(),
        });
    }

    for url in &config.failover_urls {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError::InvalidRpcUrl {
                url: url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.chain_id == 0 {
        errors.push(ValidationError::MissingChainId);
    }

    let to_address = config.to_address.trim();
    if to_address.is_empty() {
        errors.push(ValidationError::EmptyDestination);
    } else if to_address.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidDestination(config.to_address.clone()));
    }

    if config.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.max_concurrency == Some(0) {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
