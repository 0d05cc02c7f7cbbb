//! Solana Address Validation
//!
//! Pluggable "is this a plausible mint address" predicate used when pulling
//! addresses out of scraped markup. Two strictness levels:
//! - `Base58Validator`: must decode to a 32-byte public key
//! - `CharsetValidator`: length and base58 alphabet only

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Ed25519 public key length in bytes
pub const PUBKEY_LEN: usize = 32;

/// Bounds on the base58 text form of a 32-byte key
pub const MIN_ADDRESS_LEN: usize = 32;
pub const MAX_ADDRESS_LEN: usize = 44;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Address syntax predicate
pub trait AddressValidator: Send + Sync {
    fn is_valid(&self, address: &str) -> bool;
}

impl<F> AddressValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid(&self, address: &str) -> bool {
        self(address)
    }
}

/// Strict check: base58 that decodes to exactly 32 bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct Base58Validator;

impl AddressValidator for Base58Validator {
    fn is_valid(&self, address: &str) -> bool {
        bs58::decode(address)
            .into_vec()
            .map(|bytes| bytes.len() == PUBKEY_LEN)
            .unwrap_or(false)
    }
}

/// Lenient check: 32-44 characters from the base58 alphabet
#[derive(Debug, Clone, Copy, Default)]
pub struct CharsetValidator;

impl AddressValidator for CharsetValidator {
    fn is_valid(&self, address: &str) -> bool {
        (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&address.len())
            && address.chars().all(|c| BASE58_ALPHABET.contains(c))
    }
}

/// Validation mode selected in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressValidation {
    #[default]
    Base58,
    Charset,
}

impl AddressValidation {
    /// Build the predicate for this mode
    pub fn validator(self) -> Arc<dyn AddressValidator> {
        match self {
            AddressValidation::Base58 => Arc::new(Base58Validator),
            AddressValidation::Charset => Arc::new(CharsetValidator),
        }
    }
}

impl FromStr for AddressValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base58" => Ok(AddressValidation::Base58),
            "charset" => Ok(AddressValidation::Charset),
            other => Err(format!("unknown address validation mode '{}'", other)),
        }
    }
}

impl fmt::Display for AddressValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressValidation::Base58 => write!(f, "base58"),
            AddressValidation::Charset => write!(f, "charset"),
        }
    }
}
