//! Role-based allow-list stored in the precompile's own account.
//!
//! Each subject's role lives in the storage slot derived from its address word, in the
//! account at the contract address. Slots never written read as zero, which is
//! [`Role::None`].

use crate::{
    abi,
    contract::{deduct_gas, CallOutput, CallResult, PrecompileCall},
    error::MinterError,
    state::PrecompileState,
};
use alloy_primitives::{Address, Bytes, U256};

/// Gas charged by `setAdmin`, `setEnabled` and `setNone`.
pub const MODIFY_ALLOW_LIST_GAS_COST: u64 = 20_000;

/// Gas charged by `readAllowList`.
pub const READ_ALLOW_LIST_GAS_COST: u64 = 5_000;

/// Permission tier of a subject, ordered `None < Enabled < Admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Role {
    /// No permissions.
    #[default]
    None = 0,
    /// May call enabled-level functions such as `mint`.
    Enabled = 1,
    /// May call enabled-level functions and modify the allow-list.
    Admin = 2,
}

impl Role {
    /// Decodes a stored word. Unknown values carry no permissions.
    pub fn from_word(word: U256) -> Self {
        if word == U256::from(Self::Admin as u8) {
            Self::Admin
        } else if word == U256::from(Self::Enabled as u8) {
            Self::Enabled
        } else {
            Self::None
        }
    }

    /// Encodes the role as a storage word.
    pub fn to_word(self) -> U256 {
        U256::from(self as u8)
    }

    /// Returns true if this role meets or exceeds `required`.
    pub fn meets(self, required: Self) -> bool {
        self >= required
    }

    /// Returns true for `Enabled` and above.
    pub fn is_enabled(self) -> bool {
        self.meets(Self::Enabled)
    }

    /// Returns true for `Admin`.
    pub fn is_admin(self) -> bool {
        self.meets(Self::Admin)
    }
}

/// Storage slot holding the role of `subject`.
fn role_slot(subject: Address) -> U256 {
    subject.into_word().into()
}

/// Reads the role of `subject` in the allow-list of `contract`.
pub fn get_role<S: PrecompileState + ?Sized>(
    state: &mut S,
    contract: Address,
    subject: Address,
) -> Result<Role, MinterError> {
    let word = state.storage_at(contract, role_slot(subject))?;
    let role = Role::from_word(word);
    tracing::debug!(target: "native_minter", %contract, %subject, ?role, "allow list lookup");
    Ok(role)
}

/// Writes the role of `subject` in the allow-list of `contract`.
///
/// Performs no authorization; callers are expected to have checked the caller's role.
pub fn set_role<S: PrecompileState + ?Sized>(
    state: &mut S,
    contract: Address,
    subject: Address,
    role: Role,
) -> Result<(), MinterError> {
    state.set_storage_at(contract, role_slot(subject), role.to_word())
}

/// Installs `admins` as allow-list admins of `contract`.
pub fn configure_admins<S: PrecompileState + ?Sized>(
    state: &mut S,
    contract: Address,
    admins: &[Address],
) -> Result<(), MinterError> {
    for admin in admins {
        set_role(state, contract, *admin, Role::Admin)?;
    }
    tracing::info!(target: "native_minter", %contract, admins = admins.len(), "allow list admins installed");
    Ok(())
}

/// Handles `setAdmin`, `setEnabled` and `setNone`, writing `role` for the address argument.
pub fn set_role_handler<S: PrecompileState + ?Sized>(
    role: Role,
    state: &mut S,
    call: &PrecompileCall<'_>,
) -> CallResult {
    let remaining_gas = deduct_gas(call.gas, MODIFY_ALLOW_LIST_GAS_COST)?;

    let subject = abi::unpack_address_input(call.input)
        .map_err(|err| err.with_gas(remaining_gas))?;

    if call.read_only {
        return Err(MinterError::WriteProtection.with_gas(remaining_gas));
    }

    let caller_role =
        get_role(state, call.address, call.caller).map_err(|err| err.with_gas(remaining_gas))?;
    if !caller_role.is_admin() {
        tracing::warn!(target: "native_minter", caller = %call.caller, ?caller_role, "allow list modification denied");
        return Err(MinterError::CannotModifyAllowList {
            caller: call.caller,
        }
        .with_gas(remaining_gas));
    }

    set_role(state, call.address, subject, role).map_err(|err| err.with_gas(remaining_gas))?;
    tracing::info!(target: "native_minter", caller = %call.caller, %subject, ?role, "allow list role set");

    Ok(CallOutput {
        output: Bytes::new(),
        remaining_gas,
    })
}

/// Handles `readAllowList`, returning the role word of the address argument.
pub fn read_role_handler<S: PrecompileState + ?Sized>(
    state: &mut S,
    call: &PrecompileCall<'_>,
) -> CallResult {
    let remaining_gas = deduct_gas(call.gas, READ_ALLOW_LIST_GAS_COST)?;

    let subject = abi::unpack_address_input(call.input)
        .map_err(|err| err.with_gas(remaining_gas))?;

    let role =
        get_role(state, call.address, subject).map_err(|err| err.with_gas(remaining_gas))?;

    Ok(CallOutput {
        output: abi::encode_role(role),
        remaining_gas,
    })
}
