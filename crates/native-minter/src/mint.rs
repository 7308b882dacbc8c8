// Mint handler

use crate::{
    abi,
    allow_list,
    contract::{deduct_gas, CallOutput, CallResult, PrecompileCall},
    error::MinterError,
    state::PrecompileState,
};
use alloy_primitives::Bytes;

/// Base gas charged by every `mint` call.
pub const MINT_GAS_COST: u64 = 30_000;

/// Additional gas charged when the recipient account has to be created.
pub const CALL_NEW_ACCOUNT_GAS: u64 = 25_000;

/// Mints native balance to the recipient encoded in `call.input`.
///
/// Checks run in a fixed order and the first violation wins:
///
/// 1. base gas ([`MINT_GAS_COST`]), consuming all gas on failure
/// 2. read-only call
/// 3. input length
/// 4. caller enabled on the allow-list of `call.address`
/// 5. account creation gas ([`CALL_NEW_ACCOUNT_GAS`]) when the recipient does not exist
///
/// The out-of-gas error for account creation reports the gas originally supplied to the
/// call, not the gas left after the base charge.
pub fn mint_handler<S: PrecompileState + ?Sized>(
    state: &mut S,
    call: &PrecompileCall<'_>,
) -> CallResult {
    let mut remaining_gas = deduct_gas(call.gas, MINT_GAS_COST)?;

    if call.read_only {
        return Err(MinterError::WriteProtection.with_gas(remaining_gas));
    }

    let (to, amount) =
        abi::unpack_mint_input(call.input).map_err(|err| err.with_gas(remaining_gas))?;

    let caller_role = allow_list::get_role(state, call.address, call.caller)
        .map_err(|err| err.with_gas(remaining_gas))?;
    if !caller_role.is_enabled() {
        tracing::warn!(target: "native_minter", caller = %call.caller, ?caller_role, "mint denied");
        return Err(MinterError::PermissionDenied {
            caller: call.caller,
        }
        .with_gas(remaining_gas));
    }

    let exists = state
        .account_exists(to)
        .map_err(|err| err.with_gas(remaining_gas))?;
    if !exists {
        if remaining_gas < CALL_NEW_ACCOUNT_GAS {
            return Err(MinterError::OutOfGas {
                needed: CALL_NEW_ACCOUNT_GAS,
                have: call.gas,
            }
            .with_gas(0));
        }
        remaining_gas -= CALL_NEW_ACCOUNT_GAS;
        state
            .create_account(to)
            .map_err(|err| err.with_gas(remaining_gas))?;
    }

    state
        .add_balance(to, amount)
        .map_err(|err| err.with_gas(remaining_gas))?;

    tracing::info!(
        target: "native_minter",
        caller = %call.caller,
        %to,
        %amount,
        created = !exists,
        remaining_gas,
        "minted native balance"
    );

    Ok(CallOutput {
        output: Bytes::new(),
        remaining_gas,
    })
}
