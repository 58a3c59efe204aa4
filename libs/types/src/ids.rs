//! Identity types for vault participants
//!
//! An `Address` is the 20-byte account identity used by the underlying ledger
//! (EVM style). Its canonical text form is lowercase `0x`-prefixed hex, which
//! is the form embedded in signed redemption messages.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// 20-byte account identity
///
/// Parsing accepts any letter case (checksummed or not) with or without the
/// `0x` prefix. Display always yields lowercase hex with the prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from the last 20 bytes of a 32-byte digest
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[32 - ADDRESS_LEN..]);
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// True for the all-zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Lowercase `0x`-prefixed hex
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidAddress {
            input: s.to_string(),
        };
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(invalid());
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_lower_hex()
    }
}

/// One-time redemption code chosen by the trusted authority
///
/// Opaque to the vault: compared byte-for-byte, never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionCode(String);

impl RedemptionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RedemptionCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RedemptionCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RedemptionCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RedemptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
