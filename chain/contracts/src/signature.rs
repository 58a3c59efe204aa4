//! Signature Verifier — canonical redemption messages and signer recovery
//!
//! Reproduces the personal-message signing flow of EVM wallets bit-for-bit:
//!
//! 1. the redemption message is rendered as UTF-8 text,
//! 2. hashed with Keccak-256,
//! 3. the 32-byte digest is wrapped in the `"\x19Ethereum Signed Message:\n32"`
//!    envelope and hashed again,
//! 4. a 65-byte `r || s || v` secp256k1 signature over that hash is recovered
//!    to a public key, whose Keccak-256 tail is the signer's address.
//!
//! Recovery is pure: no state, no side effects. Anything malformed is rejected
//! instead of being recovered to an arbitrary address.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use tracing::debug;
use vault_types::ids::Address;
use vault_types::numeric::Amount;

use crate::errors::SignatureError;

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// Prefix of the personal-message envelope (followed by the decimal length).
const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hash of `message` wrapped in the personal-message envelope.
pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// How redemption messages are rendered before signing.
///
/// `Legacy` is the deployed wire format and must not change. `DomainBound`
/// additionally commits to the code, chain and vault so a signature cannot be
/// replayed against another deployment that shares the authority key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageScheme {
    #[default]
    Legacy,
    DomainBound { chain_id: u64 },
}

impl MessageScheme {
    /// Render the message the trusted authority signs for one redemption.
    pub fn redemption_message(
        &self,
        amount: Amount,
        recipient: &Address,
        code: &str,
        vault: &Address,
    ) -> String {
        match self {
            MessageScheme::Legacy => redemption_message(amount, recipient),
            MessageScheme::DomainBound { chain_id } => format!(
                "Redeem {} to {} with code {} on chain {} via {}",
                amount,
                recipient.to_lower_hex(),
                code,
                chain_id,
                vault.to_lower_hex()
            ),
        }
    }
}

/// `Redeem {amount} to {recipient}` with the recipient in lowercase hex.
pub fn redemption_message(amount: Amount, recipient: &Address) -> String {
    format!("Redeem {} to {}", amount, recipient.to_lower_hex())
}

/// Hash actually signed for a message: personal envelope over its Keccak digest.
pub fn signing_hash(message: &[u8]) -> [u8; 32] {
    personal_message_hash(&keccak256(message))
}

/// Split a 65-byte signature into its ECDSA part and recovery id.
///
/// Only `v` of 27 or 28 is accepted and `s` must be in the lower half order.
pub fn decode_signature(bytes: &[u8]) -> Result<(Signature, RecoveryId), SignatureError> {
    if bytes.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength(bytes.len()));
    }

    let v = bytes[64];
    let recovery_id = match v {
        27 | 28 => RecoveryId::from_byte(v - 27).ok_or(SignatureError::InvalidRecoveryId(v))?,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    let signature = Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::Malformed)?;
    if signature.normalize_s().is_some() {
        return Err(SignatureError::NonCanonical);
    }

    Ok((signature, recovery_id))
}

/// Address controlled by a public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    Address::from_digest(&keccak256(&point.as_bytes()[1..]))
}

/// Recover the address that signed `message`.
pub fn recover_signer(message: &[u8], signature: &[u8]) -> Result<Address, SignatureError> {
    let (signature, recovery_id) = decode_signature(signature)?;
    let hash = signing_hash(message);

    let key = VerifyingKey::recover_from_prehash(&hash, &signature, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    let signer = address_of(&key);

    debug!(signer = %signer, "Recovered message signer");
    Ok(signer)
}

/// Off-chain signing key of a trusted authority.
///
/// Produces signatures a wallet's personal-message signer would produce, so
/// backends and tests can authorize redemptions without a wallet.
pub struct AuthoritySigner {
    key: SigningKey,
}

impl AuthoritySigner {
    /// Load from a 32-byte secret scalar.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SignatureError> {
        let key = SigningKey::from_slice(secret).map_err(|_| SignatureError::InvalidKey)?;
        Ok(Self { key })
    }

    /// Load from a hex secret, with or without `0x`.
    pub fn from_hex(secret: &str) -> Result<Self, SignatureError> {
        let digits = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidKey)?;
        Self::from_bytes(&bytes)
    }

    /// Fresh random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut secret = [0u8; 32];
        loop {
            rng.fill_bytes(&mut secret);
            if let Ok(key) = SigningKey::from_slice(&secret) {
                return Self { key };
            }
        }
    }

    /// Address this key signs as.
    pub fn address(&self) -> Address {
        address_of(self.key.verifying_key())
    }

    /// Sign `message` the way a personal-message signer signs its Keccak digest.
    pub fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let hash = signing_hash(message);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|_| SignatureError::InvalidKey)?;

        let mut bytes = Vec::with_capacity(SIGNATURE_LEN);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(recovery_id.to_byte() + 27);
        Ok(bytes)
    }

    /// Authorize one redemption of `amount` to `recipient`.
    pub fn sign_redemption(
        &self,
        scheme: &MessageScheme,
        amount: Amount,
        recipient: &Address,
        code: &str,
        vault: &Address,
    ) -> Result<Vec<u8>, SignatureError> {
        let message = scheme.redemption_message(amount, recipient, code, vault);
        self.sign_message(message.as_bytes())
    }
}

impl fmt::Debug for AuthoritySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthoritySigner")
            .field("address", &self.address().to_lower_hex())
            .finish_non_exhaustive()
    }
}
