use crate::{
    abi::INativeMinter,
    allow_list::{self, Role},
    contract::{Handler, PrecompileFunction, StatefulPrecompile},
    error::{DispatchTableError, MinterError},
    state::PrecompileState,
};
use alloy_primitives::{address, Address};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// The address of the native minter precompile.
pub const NATIVE_MINTER_ADDRESS: Address = address!("0x0200000000000000000000000000000000000001");

/// Key of the native minter section in the genesis config extras.
pub const NATIVE_MINTER_CONFIG_KEY: &str = "contractNativeMinterConfig";

/// Environment variable holding a comma separated admin list.
pub const NATIVE_MINTER_ADMINS_ENV: &str = "EV_NATIVE_MINTER_ADMINS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing contractNativeMinterConfig in genesis config extras")]
    Missing,
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the native minter precompile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeMinterConfig {
    /// Addresses granted the admin role when the ledger is initialized.
    #[serde(default)]
    pub admin_addresses: Vec<Address>,
}

impl NativeMinterConfig {
    /// Creates a config with the given genesis admins.
    pub const fn new(admin_addresses: Vec<Address>) -> Self {
        Self { admin_addresses }
    }

    /// Creates a new `NativeMinterConfig` from environment variables.
    pub fn from_env() -> eyre::Result<Self> {
        let admin_addresses = std::env::var(NATIVE_MINTER_ADMINS_ENV)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Address::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let config = Self::new(admin_addresses);
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero address admins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_addresses.iter().any(|admin| admin.is_zero()) {
            return Err(ConfigError::Invalid(
                "native minter admin cannot be zero address".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the fixed precompile address.
    pub const fn address(&self) -> Address {
        NATIVE_MINTER_ADDRESS
    }

    /// Installs the genesis admins. Runs once per ledger initialization.
    pub fn configure<S: PrecompileState + ?Sized>(&self, state: &mut S) -> Result<(), MinterError> {
        allow_list::configure_admins(state, NATIVE_MINTER_ADDRESS, &self.admin_addresses)
    }

    /// Returns the role of `subject` on the minter allow-list.
    pub fn role_of<S: PrecompileState + ?Sized>(
        &self,
        state: &mut S,
        subject: Address,
    ) -> Result<Role, MinterError> {
        allow_list::get_role(state, NATIVE_MINTER_ADDRESS, subject)
    }

    /// Sets the role of `subject` on the minter allow-list.
    ///
    /// Assumes the change has already been authorized.
    pub fn set_role<S: PrecompileState + ?Sized>(
        &self,
        state: &mut S,
        subject: Address,
        role: Role,
    ) -> Result<(), MinterError> {
        allow_list::set_role(state, NATIVE_MINTER_ADDRESS, subject, role)
    }

    /// Assembles the dispatch table: allow-list administration plus `mint`, no fallback.
    pub fn contract(&self) -> Result<StatefulPrecompile, DispatchTableError> {
        StatefulPrecompile::new(
            NATIVE_MINTER_ADDRESS,
            [
                PrecompileFunction::new(
                    INativeMinter::setAdminCall::SIGNATURE,
                    Handler::SetRole(Role::Admin),
                ),
                PrecompileFunction::new(
                    INativeMinter::setEnabledCall::SIGNATURE,
                    Handler::SetRole(Role::Enabled),
                ),
                PrecompileFunction::new(
                    INativeMinter::setNoneCall::SIGNATURE,
                    Handler::SetRole(Role::None),
                ),
                PrecompileFunction::new(
                    INativeMinter::readAllowListCall::SIGNATURE,
                    Handler::ReadRole,
                ),
                PrecompileFunction::new(INativeMinter::mintCall::SIGNATURE, Handler::Mint),
            ],
            None,
        )
    }
}

/// Reads the native minter section from a genesis config extras blob.
///
/// Expected shape:
/// {
///   "contractNativeMinterConfig": {
///     "adminAddresses": ["0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC"]
///   }
/// }
pub fn parse_native_minter_config(extras: &Value) -> Result<NativeMinterConfig, ConfigError> {
    let section = extras
        .get(NATIVE_MINTER_CONFIG_KEY)
        .ok_or(ConfigError::Missing)?;
    let config = serde_json::from_value::<NativeMinterConfig>(section.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryState;
    use alloy_primitives::Selector;
    use serde_json::json;

    #[test]
    fn parses_genesis_extras() {
        let extras = json!({
            "contractNativeMinterConfig": {
                "adminAddresses": [
                    "0x00000000000000000000000000000000000000a1",
                    "0x00000000000000000000000000000000000000a2"
                ]
            }
        });

        let config = parse_native_minter_config(&extras).expect("valid config");

        assert_eq!(
            config.admin_addresses,
            vec![
                address!("0x00000000000000000000000000000000000000a1"),
                address!("0x00000000000000000000000000000000000000a2"),
            ]
        );
    }

    #[test]
    fn missing_section_is_reported() {
        let extras = json!({ "feeHandlers": {} });
        assert!(matches!(
            parse_native_minter_config(&extras),
            Err(ConfigError::Missing)
        ));
    }

    #[test]
    fn empty_section_has_no_admins() {
        let extras = json!({ "contractNativeMinterConfig": {} });
        let config = parse_native_minter_config(&extras).expect("valid config");
        assert!(config.admin_addresses.is_empty());
    }

    #[test]
    fn zero_admin_is_rejected() {
        let extras = json!({
            "contractNativeMinterConfig": {
                "adminAddresses": ["0x0000000000000000000000000000000000000000"]
            }
        });
        match parse_native_minter_config(&extras) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("zero address"), "{msg}"),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn malformed_address_is_rejected() {
        let extras = json!({
            "contractNativeMinterConfig": { "adminAddresses": ["not-an-address"] }
        });
        assert!(matches!(
            parse_native_minter_config(&extras),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn configure_installs_admins() {
        let admin = address!("0x00000000000000000000000000000000000000a3");
        let other = address!("0x00000000000000000000000000000000000000b3");
        let config = NativeMinterConfig::new(vec![admin]);
        let mut state = MemoryState::default();

        config.configure(&mut state).expect("configure");

        assert_eq!(config.role_of(&mut state, admin), Ok(Role::Admin));
        assert_eq!(config.role_of(&mut state, other), Ok(Role::None));

        config
            .set_role(&mut state, other, Role::Enabled)
            .expect("set role");
        assert_eq!(config.role_of(&mut state, other), Ok(Role::Enabled));
    }

    #[test]
    fn contract_routes_every_function() {
        let contract = NativeMinterConfig::default()
            .contract()
            .expect("selectors are distinct");

        assert_eq!(contract.address(), NATIVE_MINTER_ADDRESS);
        assert_eq!(
            contract.selectors().collect::<Vec<_>>(),
            vec![
                Selector::from(INativeMinter::setAdminCall::SELECTOR),
                INativeMinter::setEnabledCall::SELECTOR.into(),
                INativeMinter::setNoneCall::SELECTOR.into(),
                INativeMinter::readAllowListCall::SELECTOR.into(),
                INativeMinter::mintCall::SELECTOR.into(),
            ],
            "selectors keep registration order"
        );
        assert_eq!(
            contract.handler(INativeMinter::mintCall::SELECTOR.into()),
            Some(Handler::Mint)
        );
        assert_eq!(
            contract.handler(INativeMinter::setNoneCall::SELECTOR.into()),
            Some(Handler::SetRole(Role::None))
        );
    }
}
