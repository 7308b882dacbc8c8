//! EVM integration of the native minter.

use crate::{
    config::{NativeMinterConfig, NATIVE_MINTER_ADDRESS},
    contract::{CallOutput, StatefulPrecompile},
    error::{DispatchTableError, MinterError},
};
use alloy_evm::{
    precompiles::{DynPrecompile, Precompile, PrecompileInput, PrecompilesMap},
    revm::precompile::{PrecompileError, PrecompileId, PrecompileResult},
};
use revm::precompile::PrecompileOutput;
use std::sync::{Arc, OnceLock};

/// The native minter as an EVM precompile.
///
/// Wraps the dispatch table built at startup; every EVM instance shares the same table.
#[derive(Clone, Debug)]
pub struct NativeMinterPrecompile {
    contract: Arc<StatefulPrecompile>,
}

impl NativeMinterPrecompile {
    // Use a lazily-initialized static for the ID since `custom` is not const.
    pub fn id() -> &'static PrecompileId {
        static ID: OnceLock<PrecompileId> = OnceLock::new();
        ID.get_or_init(|| PrecompileId::custom("native_minter"))
    }

    pub fn new(contract: Arc<StatefulPrecompile>) -> Self {
        Self { contract }
    }

    /// Builds the precompile from its configuration.
    pub fn from_config(config: &NativeMinterConfig) -> Result<Self, DispatchTableError> {
        Ok(Self::new(Arc::new(config.contract()?)))
    }

    pub fn contract(&self) -> &StatefulPrecompile {
        &self.contract
    }

    fn map_error(err: MinterError) -> PrecompileError {
        match err {
            MinterError::OutOfGas { .. } => PrecompileError::OutOfGas,
            other => PrecompileError::Other(other.to_string().into()),
        }
    }
}

impl Precompile for NativeMinterPrecompile {
    fn precompile_id(&self) -> &PrecompileId {
        Self::id()
    }

    /// Routes the call through the dispatch table against the EVM journal.
    ///
    /// A STATICCALL context runs the contract read-only, so state-changing functions fail
    /// with a write-protection error.
    fn call(&self, mut input: PrecompileInput<'_>) -> PrecompileResult {
        let caller = input.caller;
        let gas_limit = input.gas;
        let data = input.data;
        let read_only = input.is_static_call();

        tracing::debug!(
            target: "native_minter",
            ?caller,
            gas = gas_limit,
            read_only,
            calldata_len = data.len(),
            "precompile call invoked"
        );

        let internals = input.internals_mut();
        match self.contract.run(internals, caller, data, gas_limit, read_only) {
            Ok(CallOutput {
                output,
                remaining_gas,
            }) => Ok(PrecompileOutput::new(gas_limit - remaining_gas, output)),
            Err(failure) => {
                tracing::debug!(
                    target: "native_minter",
                    ?caller,
                    error = %failure.error,
                    remaining_gas = failure.remaining_gas,
                    "precompile call failed"
                );
                Err(Self::map_error(failure.error))
            }
        }
    }

    fn is_pure(&self) -> bool {
        false
    }
}

/// Registers the native minter at [`NATIVE_MINTER_ADDRESS`].
pub fn install_native_minter(
    precompiles: &mut PrecompilesMap,
    config: &NativeMinterConfig,
) -> eyre::Result<()> {
    let minter = Arc::new(NativeMinterPrecompile::from_config(config)?);
    let id = NativeMinterPrecompile::id().clone();

    precompiles.apply_precompile(&NATIVE_MINTER_ADDRESS, move |_| {
        let minter_for_call = Arc::clone(&minter);
        let id_for_call = id;
        Some(DynPrecompile::new_stateful(id_for_call, move |input| {
            minter_for_call.call(input)
        }))
    });

    tracing::info!(target: "native_minter", address = %NATIVE_MINTER_ADDRESS, "native minter precompile installed");
    Ok(())
}
