//! Error types for parsing identities and amounts

use thiserror::Error;

/// Errors raised when converting text into a value type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid address: {input}")]
    InvalidAddress { input: String },

    #[error("Invalid amount {input}: {reason}")]
    InvalidAmount { input: String, reason: String },
}
