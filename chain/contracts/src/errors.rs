//! Contract-specific error types
//!
//! Error taxonomy for vault, token, signature and deployment operations.

use thiserror::Error;
use vault_types::ids::Address;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("Vault already initialized")]
    AlreadyInitialized,

    #[error("Vault not initialized")]
    NotInitialized,

    #[error("Invalid backend signature")]
    InvalidSignature,

    #[error("Redemption code already used: {code}")]
    CodeAlreadyUsed { code: String },

    #[error("Unauthorized: caller is not administrator")]
    Unauthorized,

    #[error("Token transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Asset mismatch: expected {expected}, got {actual}")]
    AssetMismatch { expected: Address, actual: Address },

    #[error("Zero address not allowed")]
    ZeroAddress,
}

/// Errors returned by the custodied token
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Insufficient balance for {holder}: required {required}, available {available}")]
    InsufficientBalance {
        holder: Address,
        required: String,
        available: String,
    },

    #[error("Insufficient allowance for {spender}: required {required}, available {available}")]
    InsufficientAllowance {
        spender: Address,
        required: String,
        available: String,
    },

    #[error("Invalid receiver: {receiver}")]
    InvalidReceiver { receiver: Address },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Transfer rejected by token: {reason}")]
    Rejected { reason: String },
}

/// Signature decoding and recovery errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignatureError {
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("Malformed signature")]
    Malformed,

    #[error("Non-canonical signature: s is in the upper half order")]
    NonCanonical,

    #[error("Public key recovery failed")]
    RecoveryFailed,

    #[error("Invalid signing key")]
    InvalidKey,
}

/// Deployment configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown network: chain id {chain_id}")]
    UnknownNetwork { chain_id: u64 },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read configuration {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Deploy-and-initialize errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Initialization failed: {0}")]
    Vault(#[from] VaultError),
}

impl From<SignatureError> for VaultError {
    fn from(_: SignatureError) -> Self {
        VaultError::InvalidSignature
    }
}
