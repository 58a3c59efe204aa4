//! Smart Contract Logic for Signed-Redemption Custody
//!
//! This crate implements the contract layer of the redemption vault: custody
//! of a single fungible asset, payouts authorized by a trusted authority's
//! signature over a one-time code, and an administrator override.
//!
//! # Modules
//! - `events`: Contract events emitted by successful calls
//! - `errors`: Contract-specific error types
//! - `security`: Authority registry and replay guard
//! - `signature`: Canonical redemption messages and signer recovery
//! - `token`: Fungible token interface and in-memory ledger token
//! - `vault`: Initialization, deposits, redemptions, emergency withdrawals
//! - `config`: Network registry and deployment settings
//! - `deploy`: Construct-then-initialize deployment helper
//!
//! # Version
//! v0.1.0

pub mod errors;
pub mod events;
pub mod security;
pub mod signature;
pub mod token;
pub mod vault;
pub mod config;
pub mod deploy;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
