//! Vault — custody, signed redemptions, and administrative override
//!
//! Implements the settlement core of the redemption vault:
//! - One-time initializer in place of a constructor
//! - Deposits pulled from the caller through the custodied token
//! - Redemptions authorized by a trusted-authority signature and a one-time code
//! - Registration flags for recipients that have redeemed
//! - Administrator-only emergency withdrawals and role handover
//!
//! Every operation is all-or-nothing. Internal effects (the consumed code) are
//! committed before the outbound token transfer, and undone if that transfer
//! fails, so no state of a failed call survives.

use std::collections::HashSet;
use tracing::{debug, info, warn};
use vault_types::ids::{Address, RedemptionCode};
use vault_types::numeric::Amount;

use crate::errors::VaultError;
use crate::events::{
    AdministratorTransferred, ContractEvent, Deposited, Initialized, Redeemed,
    TrustedAuthorityRotated,
};
use crate::security::{AuthorityRegistry, ReplayGuard};
use crate::signature::{recover_signer, MessageScheme};
use crate::token::FungibleToken;

/// State populated by `initialize`.
#[derive(Debug)]
struct VaultState {
    /// Custodied token, immutable after init
    asset: Address,
    /// Signing authority and administrator
    authorities: AuthorityRegistry,
}

/// Core vault contract holding one fungible asset.
///
/// The held balance is never stored here; it is whatever the token reports
/// for the vault's own address.
///
/// Construction only fixes the vault's identity and message scheme. Nothing
/// but the read-only queries works until `initialize` has run once.
#[derive(Debug)]
pub struct Vault {
    /// Identity of this vault on the ledger
    address: Address,
    /// Format of the messages the trusted authority signs
    scheme: MessageScheme,
    /// `None` until initialized
    state: Option<VaultState>,
    /// Consumed redemption codes
    replay_guard: ReplayGuard,
    /// Recipients with at least one successful redemption
    registered: HashSet<Address>,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl Vault {
    /// Create an uninitialized vault using the legacy message format.
    pub fn new(address: Address) -> Self {
        Self::with_scheme(address, MessageScheme::Legacy)
    }

    /// Create an uninitialized vault with an explicit message scheme.
    pub fn with_scheme(address: Address, scheme: MessageScheme) -> Self {
        Self {
            address,
            scheme,
            state: None,
            replay_guard: ReplayGuard::new(),
            registered: HashSet::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Initialization ─────────────────────────

    /// One-time setup. The caller becomes administrator.
    ///
    /// Fails with `AlreadyInitialized` on any later call, before touching state.
    pub fn initialize(
        &mut self,
        caller: Address,
        asset: Address,
        trusted_authority: Address,
    ) -> Result<ContractEvent, VaultError> {
        if self.state.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }
        if asset.is_zero() || trusted_authority.is_zero() {
            return Err(VaultError::ZeroAddress);
        }

        self.state = Some(VaultState {
            asset,
            authorities: AuthorityRegistry::new(trusted_authority, caller),
        });

        info!(
            vault = %self.address,
            asset = %asset,
            trusted_authority = %trusted_authority,
            administrator = %caller,
            "Vault initialized"
        );

        Ok(self.emit(ContractEvent::Initialized(Initialized {
            asset,
            trusted_authority,
            administrator: caller,
        })))
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Pull `amount` of the asset from `caller` into the vault.
    ///
    /// The caller must have approved the vault beforehand. Emits `Deposited`.
    pub fn deposit<T: FungibleToken + ?Sized>(
        &mut self,
        token: &mut T,
        caller: Address,
        amount: Amount,
    ) -> Result<ContractEvent, VaultError> {
        self.check_asset(token)?;
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        token
            .transfer_from(&self.address, &caller, &self.address, amount)
            .map_err(|e| {
                warn!(caller = %caller, amount = %amount, error = %e, "Deposit pull failed");
                VaultError::TransferFailed(e)
            })?;

        info!(caller = %caller, amount = %amount, "Deposit accepted");

        Ok(self.emit(ContractEvent::Deposited(Deposited {
            from: caller,
            to: self.address,
            amount,
        })))
    }

    // ───────────────────────── Redeem ─────────────────────────

    /// Pay `amount` to `caller` against a one-time `code` and the trusted
    /// authority's signature over the redemption message.
    ///
    /// Order of checks: code unused, amount, signature. The code is consumed
    /// before the payout and released again if the payout fails.
    pub fn redeem<T: FungibleToken + ?Sized>(
        &mut self,
        token: &mut T,
        caller: Address,
        code: &str,
        amount: Amount,
        signature: &[u8],
    ) -> Result<ContractEvent, VaultError> {
        self.check_asset(token)?;
        if self.replay_guard.is_used(code) {
            warn!(caller = %caller, code, "Rejected redemption: code already used");
            return Err(VaultError::CodeAlreadyUsed {
                code: code.to_string(),
            });
        }
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        let message = self
            .scheme
            .redemption_message(amount, &caller, code, &self.address);
        let signer = recover_signer(message.as_bytes(), signature).inspect_err(|e| {
            warn!(caller = %caller, code, error = %e, "Rejected redemption: malformed signature");
        })?;

        if !self.state()?.authorities.is_trusted_authority(&signer) {
            warn!(caller = %caller, code, signer = %signer, "Rejected redemption: untrusted signer");
            return Err(VaultError::InvalidSignature);
        }

        let fresh = self.replay_guard.mark_used(RedemptionCode::from(code));
        debug_assert!(fresh, "code checked unused earlier in the same call");
        debug!(code, "Redemption code consumed");

        if let Err(e) = token.transfer(&self.address, &caller, amount) {
            self.replay_guard.rollback(code);
            warn!(caller = %caller, code, amount = %amount, error = %e, "Redemption payout failed");
            return Err(VaultError::TransferFailed(e));
        }

        self.registered.insert(caller);
        info!(recipient = %caller, code, amount = %amount, "Redemption settled");

        Ok(self.emit(ContractEvent::Redeemed(Redeemed { to: caller, amount })))
    }

    // ───────────────────────── Emergency Withdrawals ─────────────────────────

    /// Push `amount` to `to`, bypassing signature and replay checks.
    /// Administrator-only.
    pub fn emergency_withdraw<T: FungibleToken + ?Sized>(
        &mut self,
        token: &mut T,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Amount, VaultError> {
        self.require_administrator(&caller)?;
        self.check_asset(token)?;
        if to.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        token.transfer(&self.address, &to, amount)?;

        warn!(administrator = %caller, to = %to, amount = %amount, "Emergency withdrawal");
        Ok(amount)
    }

    /// Push the whole held balance to the administrator.
    ///
    /// Returns the amount moved; an empty vault moves nothing.
    pub fn emergency_withdraw_all<T: FungibleToken + ?Sized>(
        &mut self,
        token: &mut T,
        caller: Address,
    ) -> Result<Amount, VaultError> {
        self.require_administrator(&caller)?;
        self.check_asset(token)?;

        let held = token.balance_of(&self.address);
        if held.is_zero() {
            return Ok(Amount::ZERO);
        }

        token.transfer(&self.address, &caller, held)?;

        warn!(administrator = %caller, amount = %held, "Emergency withdrawal of entire balance");
        Ok(held)
    }

    // ───────────────────────── Authority Registry ─────────────────────────

    /// Hand the administrator role to `new_administrator`.
    pub fn transfer_administrator(
        &mut self,
        caller: Address,
        new_administrator: Address,
    ) -> Result<ContractEvent, VaultError> {
        if new_administrator.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        let state = self.state_mut()?;
        if !state
            .authorities
            .transfer_administrator(&caller, new_administrator)
        {
            return Err(VaultError::Unauthorized);
        }

        info!(previous = %caller, new = %new_administrator, "Administrator transferred");

        Ok(self.emit(ContractEvent::AdministratorTransferred(
            AdministratorTransferred {
                previous: caller,
                new: new_administrator,
            },
        )))
    }

    /// Replace the signing authority. Administrator-only.
    ///
    /// Codes consumed under the previous authority stay consumed.
    pub fn rotate_trusted_authority(
        &mut self,
        caller: Address,
        new_authority: Address,
    ) -> Result<ContractEvent, VaultError> {
        if new_authority.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        let state = self.state_mut()?;
        let previous = state.authorities.trusted_authority();
        if !state
            .authorities
            .rotate_trusted_authority(&caller, new_authority)
        {
            return Err(VaultError::Unauthorized);
        }

        info!(previous = %previous, new = %new_authority, "Trusted authority rotated");

        Ok(self.emit(ContractEvent::TrustedAuthorityRotated(
            TrustedAuthorityRotated {
                previous,
                new: new_authority,
            },
        )))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Identity of this vault.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Scheme used to render redemption messages.
    pub fn message_scheme(&self) -> MessageScheme {
        self.scheme
    }

    /// Custodied token, once initialized.
    pub fn asset(&self) -> Option<Address> {
        self.state.as_ref().map(|s| s.asset)
    }

    /// Current signing authority, once initialized.
    pub fn trusted_authority(&self) -> Option<Address> {
        self.state
            .as_ref()
            .map(|s| s.authorities.trusted_authority())
    }

    /// Current administrator, once initialized.
    pub fn administrator(&self) -> Option<Address> {
        self.state.as_ref().map(|s| s.authorities.administrator())
    }

    /// Whether `code` has been consumed.
    pub fn code_used(&self, code: &str) -> bool {
        self.replay_guard.is_used(code)
    }

    /// Whether `account` has completed a redemption.
    pub fn is_registered(&self, account: &Address) -> bool {
        self.registered.contains(account)
    }

    /// Balance the token reports for the vault.
    pub fn held_balance<T: FungibleToken + ?Sized>(&self, token: &T) -> Amount {
        token.balance_of(&self.address)
    }

    /// The message the trusted authority must sign for this redemption.
    pub fn redemption_message(&self, amount: Amount, recipient: &Address, code: &str) -> String {
        self.scheme
            .redemption_message(amount, recipient, code, &self.address)
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn state(&self) -> Result<&VaultState, VaultError> {
        self.state.as_ref().ok_or(VaultError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut VaultState, VaultError> {
        self.state.as_mut().ok_or(VaultError::NotInitialized)
    }

    fn check_asset<T: FungibleToken + ?Sized>(&self, token: &T) -> Result<(), VaultError> {
        let expected = self.state()?.asset;
        let actual = token.address();
        if expected != actual {
            return Err(VaultError::AssetMismatch { expected, actual });
        }
        Ok(())
    }

    fn require_administrator(&self, caller: &Address) -> Result<(), VaultError> {
        if !self.state()?.authorities.is_administrator(caller) {
            warn!(caller = %caller, "Rejected administrative call");
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        debug!(event = event.label(), "Event emitted");
        self.events.push(event.clone());
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::AuthoritySigner;
    use crate::token::LedgerToken;

    const VAULT: Address = Address::from_bytes([0xaa; 20]);
    const USDC: Address = Address::from_bytes([0xee; 20]);
    const OWNER: Address = Address::from_bytes([0x01; 20]);
    const USER: Address = Address::from_bytes([0x02; 20]);
    const EVE: Address = Address::from_bytes([0x0e; 20]);

    fn backend() -> AuthoritySigner {
        AuthoritySigner::from_bytes(&[7u8; 32]).unwrap()
    }

    /// Initialized vault holding 1000 units deposited by the owner.
    fn setup_vault() -> (Vault, LedgerToken, AuthoritySigner) {
        let signer = backend();
        let mut token = LedgerToken::new(USDC, "USDC", 6);
        token.mint(&OWNER, Amount::new(1_000)).unwrap();
        token.mint(&USER, Amount::new(1_000)).unwrap();

        let mut vault = Vault::new(VAULT);
        vault.initialize(OWNER, USDC, signer.address()).unwrap();

        token.approve(&OWNER, &VAULT, Amount::new(1_000));
        vault.deposit(&mut token, OWNER, Amount::new(1_000)).unwrap();
        (vault, token, signer)
    }

    fn sign(signer: &AuthoritySigner, vault: &Vault, amount: u128, to: Address, code: &str) -> Vec<u8> {
        signer
            .sign_redemption(&vault.message_scheme(), Amount::new(amount), &to, code, &vault.address())
            .unwrap()
    }

    // ─── Initialization tests ───

    #[test]
    fn test_initialize_sets_roles() {
        let signer = backend();
        let mut vault = Vault::new(VAULT);
        assert!(!vault.is_initialized());

        vault.initialize(OWNER, USDC, signer.address()).unwrap();
        assert!(vault.is_initialized());
        assert_eq!(vault.asset(), Some(USDC));
        assert_eq!(vault.trusted_authority(), Some(signer.address()));
        assert_eq!(vault.administrator(), Some(OWNER));
        assert!(matches!(vault.events()[0], ContractEvent::Initialized(_)));
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut vault = Vault::new(VAULT);
        vault.initialize(OWNER, USDC, backend().address()).unwrap();
        let result = vault.initialize(EVE, USDC, EVE);
        assert_eq!(result, Err(VaultError::AlreadyInitialized));
        assert_eq!(vault.administrator(), Some(OWNER));
    }

    #[test]
    fn test_initialize_rejects_zero_addresses() {
        let mut vault = Vault::new(VAULT);
        assert_eq!(
            vault.initialize(OWNER, Address::ZERO, EVE),
            Err(VaultError::ZeroAddress)
        );
        assert_eq!(
            vault.initialize(OWNER, USDC, Address::ZERO),
            Err(VaultError::ZeroAddress)
        );
        assert!(!vault.is_initialized());
    }

    #[test]
    fn test_operations_before_initialize() {
        let mut vault = Vault::new(VAULT);
        let mut token = LedgerToken::new(USDC, "USDC", 6);
        assert_eq!(
            vault.deposit(&mut token, OWNER, Amount::new(1)),
            Err(VaultError::NotInitialized)
        );
        assert_eq!(
            vault.emergency_withdraw_all(&mut token, OWNER),
            Err(VaultError::NotInitialized)
        );
    }

    // ─── Deposit tests ───

    #[test]
    fn test_deposit_success() {
        let (mut vault, mut token, _) = setup_vault();
        token.approve(&USER, &VAULT, Amount::new(100));

        let event = vault.deposit(&mut token, USER, Amount::new(100)).unwrap();
        assert_eq!(
            event,
            ContractEvent::Deposited(Deposited {
                from: USER,
                to: VAULT,
                amount: Amount::new(100),
            })
        );
        assert_eq!(vault.held_balance(&token), Amount::new(1_100));
        assert_eq!(token.balance_of(&USER), Amount::new(900));
    }

    #[test]
    fn test_deposit_zero_amount() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.deposit(&mut token, USER, Amount::ZERO);
        assert_eq!(result, Err(VaultError::InvalidAmount));
    }

    #[test]
    fn test_deposit_without_allowance() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.deposit(&mut token, USER, Amount::new(10));
        assert!(matches!(result, Err(VaultError::TransferFailed(_))));
        assert_eq!(vault.held_balance(&token), Amount::new(1_000));
        assert_eq!(vault.events().len(), 2);
    }

    #[test]
    fn test_deposit_wrong_asset() {
        let (mut vault, _, _) = setup_vault();
        let mut other = LedgerToken::new(EVE, "SCAM", 6);
        let result = vault.deposit(&mut other, USER, Amount::new(1));
        assert!(matches!(result, Err(VaultError::AssetMismatch { .. })));
    }

    // ─── Redeem tests ───

    #[test]
    fn test_redeem_success() {
        let (mut vault, mut token, signer) = setup_vault();
        let signature = sign(&signer, &vault, 100, USER, "TESTCODE123");

        let event = vault
            .redeem(&mut token, USER, "TESTCODE123", Amount::new(100), &signature)
            .unwrap();

        assert_eq!(
            event,
            ContractEvent::Redeemed(Redeemed {
                to: USER,
                amount: Amount::new(100),
            })
        );
        assert_eq!(vault.held_balance(&token), Amount::new(900));
        assert_eq!(token.balance_of(&USER), Amount::new(1_100));
        assert!(vault.code_used("TESTCODE123"));
        assert!(vault.is_registered(&USER));
    }

    #[test]
    fn test_redeem_code_reuse() {
        let (mut vault, mut token, signer) = setup_vault();
        let first = sign(&signer, &vault, 100, USER, "C1");
        vault
            .redeem(&mut token, USER, "C1", Amount::new(100), &first)
            .unwrap();

        let second = sign(&signer, &vault, 50, USER, "C1");
        let result = vault.redeem(&mut token, USER, "C1", Amount::new(50), &second);
        assert_eq!(
            result,
            Err(VaultError::CodeAlreadyUsed {
                code: "C1".to_string()
            })
        );
        assert_eq!(vault.held_balance(&token), Amount::new(900));
    }

    #[test]
    fn test_redeem_used_code_with_zero_amount() {
        let (mut vault, mut token, signer) = setup_vault();
        let first = sign(&signer, &vault, 100, USER, "C1");
        vault
            .redeem(&mut token, USER, "C1", Amount::new(100), &first)
            .unwrap();

        let result = vault.redeem(&mut token, USER, "C1", Amount::ZERO, &first);
        assert_eq!(
            result,
            Err(VaultError::CodeAlreadyUsed {
                code: "C1".to_string()
            })
        );
    }

    #[test]
    fn test_redeem_signed_by_stranger() {
        let (mut vault, mut token, _) = setup_vault();
        let stranger = AuthoritySigner::from_bytes(&[9u8; 32]).unwrap();
        let signature = sign(&stranger, &vault, 100, USER, "C1");

        let result = vault.redeem(&mut token, USER, "C1", Amount::new(100), &signature);
        assert_eq!(result, Err(VaultError::InvalidSignature));
        assert!(!vault.code_used("C1"));
        assert!(!vault.is_registered(&USER));
    }

    #[test]
    fn test_redeem_signature_for_other_recipient() {
        let (mut vault, mut token, signer) = setup_vault();
        let signature = sign(&signer, &vault, 100, USER, "C1");

        let result = vault.redeem(&mut token, EVE, "C1", Amount::new(100), &signature);
        assert_eq!(result, Err(VaultError::InvalidSignature));
    }

    #[test]
    fn test_redeem_signature_for_other_amount() {
        let (mut vault, mut token, signer) = setup_vault();
        let signature = sign(&signer, &vault, 100, USER, "C1");

        let result = vault.redeem(&mut token, USER, "C1", Amount::new(999), &signature);
        assert_eq!(result, Err(VaultError::InvalidSignature));
    }

    #[test]
    fn test_redeem_malformed_signature() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.redeem(&mut token, USER, "C1", Amount::new(1), b"garbage");
        assert_eq!(result, Err(VaultError::InvalidSignature));
        assert!(!vault.code_used("C1"));
    }

    #[test]
    fn test_redeem_zero_amount() {
        let (mut vault, mut token, signer) = setup_vault();
        let signature = sign(&signer, &vault, 0, USER, "C1");
        let result = vault.redeem(&mut token, USER, "C1", Amount::ZERO, &signature);
        assert_eq!(result, Err(VaultError::InvalidAmount));
    }

    #[test]
    fn test_redeem_insufficient_vault_balance_rolls_back_code() {
        let (mut vault, mut token, signer) = setup_vault();
        let signature = sign(&signer, &vault, 5_000, USER, "BIG");

        let result = vault.redeem(&mut token, USER, "BIG", Amount::new(5_000), &signature);
        assert!(matches!(result, Err(VaultError::TransferFailed(_))));
        assert!(!vault.code_used("BIG"));
        assert!(!vault.is_registered(&USER));
        assert_eq!(vault.held_balance(&token), Amount::new(1_000));
    }

    #[test]
    fn test_redeem_domain_bound_scheme() {
        let signer = backend();
        let mut token = LedgerToken::new(USDC, "USDC", 6);
        token.mint(&OWNER, Amount::new(500)).unwrap();
        let mut vault = Vault::with_scheme(VAULT, MessageScheme::DomainBound { chain_id: 8453 });
        vault.initialize(OWNER, USDC, signer.address()).unwrap();
        token.approve(&OWNER, &VAULT, Amount::new(500));
        vault.deposit(&mut token, OWNER, Amount::new(500)).unwrap();

        // A legacy-format signature does not authorize a domain-bound vault.
        let legacy = signer
            .sign_redemption(&MessageScheme::Legacy, Amount::new(10), &USER, "D1", &VAULT)
            .unwrap();
        assert_eq!(
            vault.redeem(&mut token, USER, "D1", Amount::new(10), &legacy),
            Err(VaultError::InvalidSignature)
        );

        let bound = sign(&signer, &vault, 10, USER, "D1");
        vault
            .redeem(&mut token, USER, "D1", Amount::new(10), &bound)
            .unwrap();
        assert_eq!(vault.held_balance(&token), Amount::new(490));
    }

    // ─── Emergency withdrawal tests ───

    #[test]
    fn test_emergency_withdraw() {
        let (mut vault, mut token, _) = setup_vault();
        let moved = vault
            .emergency_withdraw(&mut token, OWNER, USER, Amount::new(100))
            .unwrap();
        assert_eq!(moved, Amount::new(100));
        assert_eq!(token.balance_of(&USER), Amount::new(1_100));
        assert_eq!(vault.held_balance(&token), Amount::new(900));
    }

    #[test]
    fn test_emergency_withdraw_to_zero_address() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.emergency_withdraw(&mut token, OWNER, Address::ZERO, Amount::new(400));
        assert_eq!(result, Err(VaultError::ZeroAddress));
        assert_eq!(token.balance_of(&Address::ZERO), Amount::ZERO);
        assert_eq!(vault.held_balance(&token), Amount::new(1_000));
    }

    #[test]
    fn test_emergency_withdraw_unauthorized() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.emergency_withdraw(&mut token, EVE, EVE, Amount::new(100));
        assert_eq!(result, Err(VaultError::Unauthorized));
        assert_eq!(vault.held_balance(&token), Amount::new(1_000));
    }

    #[test]
    fn test_emergency_withdraw_more_than_held() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.emergency_withdraw(&mut token, OWNER, OWNER, Amount::new(1_001));
        assert!(matches!(result, Err(VaultError::TransferFailed(_))));
    }

    #[test]
    fn test_emergency_withdraw_all() {
        let (mut vault, mut token, _) = setup_vault();
        let moved = vault.emergency_withdraw_all(&mut token, OWNER).unwrap();
        assert_eq!(moved, Amount::new(1_000));
        assert_eq!(vault.held_balance(&token), Amount::ZERO);
        assert_eq!(token.balance_of(&OWNER), Amount::new(1_000));
    }

    #[test]
    fn test_emergency_withdraw_all_empty_vault() {
        let (mut vault, mut token, _) = setup_vault();
        vault.emergency_withdraw_all(&mut token, OWNER).unwrap();
        let moved = vault.emergency_withdraw_all(&mut token, OWNER).unwrap();
        assert_eq!(moved, Amount::ZERO);
    }

    #[test]
    fn test_emergency_withdraw_all_unauthorized() {
        let (mut vault, mut token, _) = setup_vault();
        let result = vault.emergency_withdraw_all(&mut token, USER);
        assert_eq!(result, Err(VaultError::Unauthorized));
    }

    // ─── Authority registry tests ───

    #[test]
    fn test_transfer_administrator() {
        let (mut vault, mut token, _) = setup_vault();
        vault.transfer_administrator(OWNER, USER).unwrap();
        assert_eq!(vault.administrator(), Some(USER));

        assert_eq!(
            vault.emergency_withdraw_all(&mut token, OWNER),
            Err(VaultError::Unauthorized)
        );
        assert!(vault.emergency_withdraw_all(&mut token, USER).is_ok());
    }

    #[test]
    fn test_transfer_administrator_unauthorized() {
        let (mut vault, _, _) = setup_vault();
        assert_eq!(
            vault.transfer_administrator(EVE, EVE),
            Err(VaultError::Unauthorized)
        );
    }

    #[test]
    fn test_transfer_administrator_to_zero() {
        let (mut vault, _, _) = setup_vault();
        assert_eq!(
            vault.transfer_administrator(OWNER, Address::ZERO),
            Err(VaultError::ZeroAddress)
        );
    }

    #[test]
    fn test_rotation_keeps_consumed_codes() {
        let (mut vault, mut token, signer) = setup_vault();
        let signature = sign(&signer, &vault, 10, USER, "R1");
        vault
            .redeem(&mut token, USER, "R1", Amount::new(10), &signature)
            .unwrap();

        let next = AuthoritySigner::from_bytes(&[8u8; 32]).unwrap();
        vault.rotate_trusted_authority(OWNER, next.address()).unwrap();

        let replay = sign(&next, &vault, 10, USER, "R1");
        assert!(matches!(
            vault.redeem(&mut token, USER, "R1", Amount::new(10), &replay),
            Err(VaultError::CodeAlreadyUsed { .. })
        ));

        let old_key = sign(&signer, &vault, 10, USER, "R2");
        assert_eq!(
            vault.redeem(&mut token, USER, "R2", Amount::new(10), &old_key),
            Err(VaultError::InvalidSignature)
        );
    }

    #[test]
    fn test_rotate_unauthorized() {
        let (mut vault, _, _) = setup_vault();
        assert_eq!(
            vault.rotate_trusted_authority(EVE, EVE),
            Err(VaultError::Unauthorized)
        );
    }

    // ─── Events tests ───

    #[test]
    fn test_drain_events() {
        let (mut vault, _, _) = setup_vault();
        let events = vault.drain_events();
        assert_eq!(events.len(), 2);
        assert!(vault.events().is_empty());
    }
}
