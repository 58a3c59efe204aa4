//! External Token Interface — the fungible asset held in custody
//!
//! The vault never keeps its own copy of balances; it asks the token. Any
//! standard fungible-asset contract fits behind `FungibleToken`. `LedgerToken`
//! is an in-memory implementation used for simulation and tests.
//!
//! Every call is all-or-nothing: a failing transfer leaves no balance or
//! allowance changed.

use std::collections::HashMap;
use vault_types::ids::Address;
use vault_types::numeric::Amount;

use crate::errors::TokenError;

/// Minimal fungible-asset surface the vault relies on.
pub trait FungibleToken {
    /// Identity of the token contract.
    fn address(&self) -> Address;

    /// Balance held by `holder`.
    fn balance_of(&self, holder: &Address) -> Amount;

    /// Move `amount` from `from` (the calling holder) to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError>;
}

/// In-memory fungible token with allowances.
#[derive(Debug, Clone)]
pub struct LedgerToken {
    address: Address,
    symbol: String,
    decimals: u32,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl LedgerToken {
    /// Create an empty token.
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: Amount::ZERO,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Create `amount` new tokens for `to`.
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TokenError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Set the allowance `spender` may pull from `owner`.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Remaining allowance of `spender` over `owner`'s tokens.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver { receiver: *to });
        }

        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| TokenError::InsufficientBalance {
                holder: *from,
                required: amount.to_string(),
                available: available.to_string(),
            })?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

impl FungibleToken for LedgerToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(from, spender);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or_else(|| TokenError::InsufficientAllowance {
                spender: *spender,
                required: amount.to_string(),
                available: allowed.to_string(),
            })?;

        self.move_balance(from, to, amount)?;
        self.allowances.insert((*from, *spender), remaining);
        Ok(())
    }
}
