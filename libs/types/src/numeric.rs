//! Token amounts in integer base units
//!
//! The custodied asset is accounted in its smallest unit (e.g. 1 USDC =
//! 1_000_000 base units). `Amount` never goes negative and every arithmetic
//! operation is checked. Conversion to and from human decimal notation goes
//! through rust_decimal so no floating point is ever involved.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// Largest number of fractional digits accepted by `parse_units`
pub const MAX_DECIMALS: u32 = 18;

/// Unsigned token amount in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(base_units: u128) -> Self {
        Self(base_units)
    }

    pub const fn base_units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parse a human decimal string into base units.
    ///
    /// `parse_units("100", 6)` yields 100_000_000. Fails on negative input,
    /// on more fractional digits than `decimals`, and on overflow.
    pub fn parse_units(value: &str, decimals: u32) -> Result<Amount, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidAmount {
            input: value.to_string(),
            reason: reason.to_string(),
        };

        if decimals > MAX_DECIMALS {
            return Err(invalid("unsupported decimals"));
        }

        let parsed = Decimal::from_str(value.trim()).map_err(|_| invalid("not a decimal number"))?;
        if parsed.is_sign_negative() && !parsed.is_zero() {
            return Err(invalid("negative amount"));
        }

        let scaled = parsed
            .checked_mul(Decimal::from(10u64.pow(decimals)))
            .ok_or_else(|| invalid("amount out of range"))?;
        if !scaled.fract().is_zero() {
            return Err(invalid("too many decimal places"));
        }

        scaled
            .trunc()
            .to_u128()
            .map(Amount)
            .ok_or_else(|| invalid("amount out of range"))
    }

    /// Render as a human decimal value with `decimals` fractional digits.
    ///
    /// Returns `None` when the amount exceeds the decimal range.
    pub fn format_units(&self, decimals: u32) -> Option<Decimal> {
        let mantissa = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(mantissa, decimals)
            .ok()
            .map(|d| d.normalize())
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ParseError;

    /// Parse an integer count of base units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| ParseError::InvalidAmount {
                input: s.to_string(),
                reason: "not an integer base-unit amount".to_string(),
            })
    }
}
