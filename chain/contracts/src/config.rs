//! Deployment configuration
//!
//! Network registry (which token is custodied on which chain) and the
//! per-deployment settings handed to the initializer. Key material is never
//! part of the configuration; only the authority's public address is.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use vault_types::ids::Address;

use crate::errors::ConfigError;
use crate::signature::MessageScheme;

/// Base Sepolia test network
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;
/// Base main network
pub const BASE_MAINNET_CHAIN_ID: u64 = 8453;

const KNOWN_NETWORKS: &[(u64, &str, &str)] = &[
    (
        BASE_SEPOLIA_CHAIN_ID,
        "base-sepolia",
        "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
    ),
    (
        BASE_MAINNET_CHAIN_ID,
        "base-mainnet",
        "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
    ),
];

/// A network the vault can be deployed to, with its custodied USDC token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub asset: Address,
}

impl NetworkConfig {
    /// Look up a known network by chain id.
    pub fn for_chain(chain_id: u64) -> Result<Self, ConfigError> {
        let (id, name, asset) = KNOWN_NETWORKS
            .iter()
            .find(|(id, _, _)| *id == chain_id)
            .ok_or(ConfigError::UnknownNetwork { chain_id })?;

        let asset = asset
            .parse()
            .map_err(|e: vault_types::errors::ParseError| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            chain_id: *id,
            name: (*name).to_string(),
            asset,
        })
    }

    /// All built-in networks.
    pub fn known() -> Result<Vec<Self>, ConfigError> {
        KNOWN_NETWORKS
            .iter()
            .map(|(id, _, _)| Self::for_chain(*id))
            .collect()
    }
}

/// Settings for one vault deployment.
///
/// `asset` falls back to the network registry; `trusted_authority` falls back
/// to the deploying account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub chain_id: u64,
    pub asset: Option<Address>,
    pub trusted_authority: Option<Address>,
    pub message_scheme: MessageScheme,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            asset: None,
            trusted_authority: None,
            message_scheme: MessageScheme::Legacy,
        }
    }
}

impl DeploymentConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), chain_id = config.chain_id, "Loaded deployment config");
        Ok(config)
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let MessageScheme::DomainBound { chain_id } = self.message_scheme {
            if chain_id != self.chain_id {
                return Err(ConfigError::Invalid(format!(
                    "message scheme bound to chain {} but deploying to chain {}",
                    chain_id, self.chain_id
                )));
            }
        }
        if self.asset.is_some_and(|a| a.is_zero()) {
            return Err(ConfigError::Invalid("asset is the zero address".to_string()));
        }
        if self.trusted_authority.is_some_and(|a| a.is_zero()) {
            return Err(ConfigError::Invalid(
                "trusted authority is the zero address".to_string(),
            ));
        }
        Ok(())
    }

    /// Token to custody on this chain.
    pub fn resolve_asset(&self) -> Result<Address, ConfigError> {
        match self.asset {
            Some(asset) => Ok(asset),
            None => NetworkConfig::for_chain(self.chain_id).map(|n| n.asset),
        }
    }

    /// Signing authority, defaulting to the deployer.
    pub fn resolve_trusted_authority(&self, deployer: Address) -> Address {
        self.trusted_authority.unwrap_or(deployer)
    }
}
