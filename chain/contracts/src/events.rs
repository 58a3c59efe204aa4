//! Contract events
//!
//! Events are immutable records emitted by successful vault operations and
//! consumed by off-chain observers. A failed call emits nothing.

use serde::{Deserialize, Serialize};
use vault_types::ids::Address;
use vault_types::numeric::Amount;

/// Vault bootstrapped by its initializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initialized {
    pub asset: Address,
    pub trusted_authority: Address,
    pub administrator: Address,
}

/// Tokens pulled from `from` into the vault at `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// Tokens pushed to `to` against a signed one-time code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redeemed {
    pub to: Address,
    pub amount: Amount,
}

/// Administrator role handed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorTransferred {
    pub previous: Address,
    pub new: Address,
}

/// Signing authority replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedAuthorityRotated {
    pub previous: Address,
    pub new: Address,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Initialized(Initialized),
    Deposited(Deposited),
    Redeemed(Redeemed),
    AdministratorTransferred(AdministratorTransferred),
    TrustedAuthorityRotated(TrustedAuthorityRotated),
}

impl ContractEvent {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            ContractEvent::Initialized(_) => "Initialized",
            ContractEvent::Deposited(_) => "Deposited",
            ContractEvent::Redeemed(_) => "Redeemed",
            ContractEvent::AdministratorTransferred(_) => "AdministratorTransferred",
            ContractEvent::TrustedAuthorityRotated(_) => "TrustedAuthorityRotated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposited_serialization() {
        let event = Deposited {
            from: Address::from_bytes([1u8; 20]),
            to: Address::from_bytes([2u8; 20]),
            amount: Amount::new(100_000_000),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("0x0101010101010101010101010101010101010101"));
        let deser: Deposited = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_contract_event_enum_variant() {
        let event = ContractEvent::Redeemed(Redeemed {
            to: Address::from_bytes([3u8; 20]),
            amount: Amount::new(5),
        });
        assert!(matches!(event, ContractEvent::Redeemed(_)));
        assert_eq!(event.label(), "Redeemed");
    }
}
