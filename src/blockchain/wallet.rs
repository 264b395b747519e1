//! Account resolution from private-key secrets.
//!
//! # Security
//! - Keys are never logged or serialized
//! - An account owns its signer exclusively for one dispatch

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

/// Hex digits in a 256-bit secret.
const KEY_HEX_LEN: usize = 64;

/// A private key string that is not a valid secp256k1 secret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid private key: {0}")]
pub struct InvalidKey(pub String);

/// Signing account derived from one private key.
#[derive(Debug)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    /// Resolve an account from a hex-encoded private key.
    ///
    /// # Arguments
    /// * `private_key_hex` - 64 hex digits, optionally prefixed by one `0x`
    ///
    /// Deterministic and side-effect free.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, InvalidKey> {
        let key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);

        if key_hex.len() != KEY_HEX_LEN {
            return Err(InvalidKey(format!(
                "expected {} hex digits, got {}",
                KEY_HEX_LEN,
                key_hex.len()
            )));
        }
        if !key_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidKey("non-hex character in key".to_string()));
        }

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| InvalidKey(format!("{}", e)))?;

        Ok(Self { signer })
    }

    /// The account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The signing key, for the transaction signer.
    pub(crate) fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}
