//! Transaction building and signing.
//!
//! # Responsibilities
//! - Parse the configured transfer literals (value, gas price, call data)
//! - Resolve per-account parameters (nonce, gas price) against the ledger
//! - Sign with EIP-155 replay protection and produce the raw broadcast bytes

use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::hex;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::blockchain::ledger::LedgerClient;
use crate::blockchain::types::ChainId;
use crate::blockchain::wallet::Account;
use crate::config::validation::ValidationError;
use crate::config::DispatchConfig;
use crate::dispatch::outcome::DispatchError;

/// Transfer parameters shared by every account of a dispatch.
#[derive(Debug, Clone)]
pub struct TransferTemplate {
    /// Destination address.
    pub to: Address,
    /// Decimal value in wei; empty means zero.
    pub value: String,
    /// Gas limit per transaction.
    pub gas_limit: u64,
    /// Decimal gas price override in wei.
    pub gas_price: Option<String>,
    /// Hex call data.
    pub data: Option<String>,
    /// Chain the signatures are bound to.
    pub chain_id: ChainId,
}

impl TransferTemplate {
    /// Extract the transfer parameters from a loaded configuration.
    pub fn from_config(config: &DispatchConfig) -> Result<Self, ValidationError> {
        let to = config
            .to_address
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidDestination(config.to_address.clone()))?;

        Ok(Self {
            to,
            value: config.value.clone(),
            gas_limit: config.gas_limit,
            gas_price: config.gas_price_override().map(str::to_string),
            data: config.call_data().map(str::to_string),
            chain_id: ChainId(config.chain_id),
        })
    }
}

/// A transaction ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub data: Bytes,
}

/// A chain-bound signed transaction.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    signed: Signed<TxLegacy>,
}

impl SignedTransaction {
    /// Transaction identifier.
    pub fn hash(&self) -> TxHash {
        *self.signed.hash()
    }

    /// Chain the signature is bound to.
    pub fn chain_id(&self) -> Option<u64> {
        self.signed.tx().chain_id
    }

    /// The underlying signed legacy transaction.
    pub fn inner(&self) -> &Signed<TxLegacy> {
        &self.signed
    }

    /// EIP-2718 encoding suitable for `eth_sendRawTransaction`.
    pub fn encoded(&self) -> Bytes {
        TxEnvelope::from(self.signed.clone()).encoded_2718().into()
    }
}

/// Parse a base-10 non-negative integer. Only the empty string is zero.
fn parse_decimal(literal: &str) -> Option<U256> {
    if literal.is_empty() {
        return Some(U256::ZERO);
    }
    if !literal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(literal, 10).ok()
}

/// Parse the transfer value.
pub fn parse_value(literal: &str) -> Result<U256, DispatchError> {
    parse_decimal(literal).ok_or_else(|| DispatchError::InvalidAmount(literal.to_string()))
}

/// Parse a gas price override. It must fit the legacy 128-bit gas price field.
pub fn parse_gas_price(literal: &str) -> Result<u128, DispatchError> {
    parse_decimal(literal)
        .and_then(|price| u128::try_from(price).ok())
        .ok_or_else(|| DispatchError::InvalidGasPrice(literal.to_string()))
}

/// Decode hex call data. Absent or empty input yields an empty payload.
///
/// At most one `0x` prefix is accepted; everything after it must be hex.
pub fn parse_data(literal: Option<&str>) -> Result<Bytes, DispatchError> {
    let Some(literal) = literal.filter(|s| !s.is_empty()) else {
        return Ok(Bytes::new());
    };
    let digits = literal.strip_prefix("0x").unwrap_or(literal);
    if let Some(pos) = digits.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(DispatchError::InvalidData(format!(
            "{}: invalid character at offset {}",
            literal,
            literal.len() - digits.len() + pos
        )));
    }
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| DispatchError::InvalidData(format!("{}: {}", literal, e)))
}

/// Builds the unsigned transaction for one account.
pub struct TxBuilder<'a> {
    ledger: &'a dyn LedgerClient,
    template: &'a TransferTemplate,
}

impl<'a> TxBuilder<'a> {
    /// Create a new transaction builder.
    pub fn new(ledger: &'a dyn LedgerClient, template: &'a TransferTemplate) -> Self {
        Self { ledger, template }
    }

    /// Resolve every parameter for `account` and assemble the transaction.
    ///
    /// Literals are parsed before the ledger is consulted, so a malformed
    /// literal never costs a network round trip.
    pub async fn build(&self, account: &Account) -> Result<UnsignedTransaction, DispatchError> {
        let address = account.address();

        let value = parse_value(&self.template.value)?;
        let gas_price_override = self
            .template
            .gas_price
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(parse_gas_price)
            .transpose()?;
        let data = parse_data(self.template.data.as_deref())?;

        let nonce = self
            .ledger
            .pending_nonce(address)
            .await
            .map_err(|source| DispatchError::NonceQueryFailed { address, source })?;

        let gas_price = match gas_price_override {
            Some(price) => price,
            None => {
                let suggested = self
                    .ledger
                    .suggested_gas_price()
                    .await
                    .map_err(|source| DispatchError::GasPriceQueryFailed { address, source })?;
                u128::try_from(suggested).map_err(|_| {
                    DispatchError::InvalidGasPrice(format!(
                        "suggested gas price {} out of range",
                        suggested
                    ))
                })?
            }
        };

        tracing::debug!(
            address = %address,
            nonce,
            gas_price,
            gas_limit = self.template.gas_limit,
            "Transaction parameters resolved"
        );

        Ok(UnsignedTransaction {
            nonce,
            to: self.template.to,
            value,
            gas_limit: self.template.gas_limit,
            gas_price,
            data,
        })
    }
}

/// Sign `tx` for `chain_id` with the account's key (EIP-155).
pub fn sign_transaction(
    tx: UnsignedTransaction,
    chain_id: ChainId,
    account: &Account,
) -> Result<SignedTransaction, DispatchError> {
    let mut legacy = TxLegacy {
        chain_id: Some(chain_id.0),
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: TxKind::Call(tx.to),
        value: tx.value,
        input: tx.data,
    };

    let signature = account
        .signer()
        .sign_transaction_sync(&mut legacy)
        .map_err(|e| DispatchError::SigningFailed(e.to_string()))?;

    Ok(SignedTransaction {
        signed: legacy.into_signed(signature),
    })
}
