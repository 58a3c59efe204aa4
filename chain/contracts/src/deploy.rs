//! Deploy helper — construct then initialize
//!
//! Stands in for the proxy deployment flow: the vault object is created
//! first, then populated by its one-time initializer with the deployer as
//! administrator.

use tracing::info;
use vault_types::ids::Address;

use crate::config::DeploymentConfig;
use crate::errors::DeployError;
use crate::vault::Vault;

/// Create a vault at `vault_address` and initialize it from `config`.
pub fn deploy(
    config: &DeploymentConfig,
    deployer: Address,
    vault_address: Address,
) -> Result<Vault, DeployError> {
    config.validate()?;
    let asset = config.resolve_asset()?;
    let trusted_authority = config.resolve_trusted_authority(deployer);

    let mut vault = Vault::with_scheme(vault_address, config.message_scheme);
    vault.initialize(deployer, asset, trusted_authority)?;

    info!(
        vault = %vault_address,
        chain_id = config.chain_id,
        deployer = %deployer,
        "Vault deployed"
    );
    Ok(vault)
}
