//! Shared security primitives for the vault
//!
//! Provides the authority registry (who signs, who administers) and the
//! replay guard (which one-time codes are spent).

use std::collections::HashSet;
use vault_types::ids::{Address, RedemptionCode};

/// Holds the two privileged identities of a deployment.
///
/// The trusted authority signs redemptions; the administrator gates the
/// emergency paths and may hand its role to someone else.
#[derive(Debug, Clone)]
pub struct AuthorityRegistry {
    trusted_authority: Address,
    administrator: Address,
}

impl AuthorityRegistry {
    /// Create a registry with its initial identities.
    pub fn new(trusted_authority: Address, administrator: Address) -> Self {
        Self {
            trusted_authority,
            administrator,
        }
    }

    /// Check if a caller is the administrator.
    pub fn is_administrator(&self, caller: &Address) -> bool {
        self.administrator == *caller
    }

    /// Check if an identity is the current signing authority.
    pub fn is_trusted_authority(&self, signer: &Address) -> bool {
        self.trusted_authority == *signer
    }

    /// Transfer the administrator role. Returns `false` if the caller is not
    /// the current administrator.
    pub fn transfer_administrator(&mut self, caller: &Address, new_administrator: Address) -> bool {
        if !self.is_administrator(caller) {
            return false;
        }
        self.administrator = new_administrator;
        true
    }

    /// Replace the signing authority. Administrator-only.
    pub fn rotate_trusted_authority(&mut self, caller: &Address, new_authority: Address) -> bool {
        if !self.is_administrator(caller) {
            return false;
        }
        self.trusted_authority = new_authority;
        true
    }

    pub fn trusted_authority(&self) -> Address {
        self.trusted_authority
    }

    pub fn administrator(&self) -> Address {
        self.administrator
    }
}

/// Consumed-code tracker for replay protection.
///
/// A code can be consumed once per vault. Consumption is permanent except for
/// the rollback of the very call that consumed it.
#[derive(Debug, Clone, Default)]
pub struct ReplayGuard {
    used_codes: HashSet<RedemptionCode>,
}

impl ReplayGuard {
    /// Create a new empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a code has been consumed.
    pub fn is_used(&self, code: &str) -> bool {
        self.used_codes.contains(code)
    }

    /// Mark a code as consumed. Returns `false` if it already was.
    pub fn mark_used(&mut self, code: RedemptionCode) -> bool {
        self.used_codes.insert(code)
    }

    /// Undo a mark made earlier in the same failed call.
    pub(crate) fn rollback(&mut self, code: &str) {
        self.used_codes.remove(code);
    }

    /// Number of consumed codes.
    pub fn count(&self) -> usize {
        self.used_codes.len()
    }
}
