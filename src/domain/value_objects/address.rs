//! # Wallet Address
//!
//! EVM wallet address with validation and case-insensitive equality.
//!
//! Addresses are normalized to lowercase at construction so that two
//! differently-checksummed spellings of the same address compare equal
//! and hash identically.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::address::WalletAddress;
//!
//! let addr = WalletAddress::parse("0x8A627a75D04bf3c709154205dfbbb6F4eD10dcb0").unwrap();
//! assert_eq!(addr.as_str(), "0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when parsing an invalid wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid wallet address: {0}")]
pub struct InvalidAddressError(pub String);

/// An EVM wallet address (`0x` + 40 hex digits), stored lowercase.
///
/// # Invariants
///
/// - Always `0x`-prefixed
/// - Exactly 40 hexadecimal digits after the prefix
/// - Lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parses and normalizes a wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddressError`] if the input is not a
    /// `0x`-prefixed 40-digit hex string.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, InvalidAddressError> {
        let raw = input.as_ref().trim();
        let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) else {
            return Err(InvalidAddressError(raw.to_string()));
        };
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidAddressError(raw.to_string()));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// Returns the address as a lowercase string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = InvalidAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}
