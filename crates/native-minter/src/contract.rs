//! Selector-routed stateful precompile.
//!
//! A [`StatefulPrecompile`] owns an immutable table from 4-byte selectors to
//! [`Handler`]s and routes each call by the leading selector of its input. The table is
//! built once at startup and shared read-only afterwards.

use crate::{
    abi::{function_selector, SELECTOR_LEN},
    allow_list::{self, Role},
    error::{CallFailure, DispatchTableError, MinterError},
    mint,
    state::PrecompileState,
};
use alloy_primitives::{Address, Bytes, Selector};
use std::collections::BTreeMap;

/// Context of a single precompile invocation.
#[derive(Debug, Clone, Copy)]
pub struct PrecompileCall<'a> {
    /// Address that called the precompile, as reported by the EVM.
    pub caller: Address,
    /// Address of the precompile being executed.
    pub address: Address,
    /// Full call data, selector included.
    pub input: &'a [u8],
    /// Gas supplied to the call.
    pub gas: u64,
    /// Whether the call must not mutate state.
    pub read_only: bool,
}

/// Output of a successful precompile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutput {
    /// Returned bytes.
    pub output: Bytes,
    /// Gas left to the caller.
    pub remaining_gas: u64,
}

/// Result of a precompile call.
pub type CallResult = Result<CallOutput, CallFailure>;

/// Charges `cost` from `supplied`. When it does not fit, the whole budget is consumed.
pub(crate) fn deduct_gas(supplied: u64, cost: u64) -> Result<u64, CallFailure> {
    supplied.checked_sub(cost).ok_or_else(|| {
        MinterError::OutOfGas {
            needed: cost,
            have: supplied,
        }
        .with_gas(0)
    })
}

/// Function implementations a dispatch table can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Writes the given role for the address argument; admin callers only.
    SetRole(Role),
    /// Returns the stored role of the address argument.
    ReadRole,
    /// Credits native balance to the address argument; enabled callers only.
    Mint,
}

impl Handler {
    /// Runs the handler against `state`.
    pub fn execute<S: PrecompileState + ?Sized>(
        self,
        state: &mut S,
        call: &PrecompileCall<'_>,
    ) -> CallResult {
        match self {
            Self::SetRole(role) => allow_list::set_role_handler(role, state, call),
            Self::ReadRole => allow_list::read_role_handler(state, call),
            Self::Mint => mint::mint_handler(state, call),
        }
    }
}

/// A selector bound to its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecompileFunction {
    selector: Selector,
    handler: Handler,
}

impl PrecompileFunction {
    /// Binds the selector of `signature` to `handler`.
    pub fn new(signature: &str, handler: Handler) -> Self {
        Self::with_selector(function_selector(signature), handler)
    }

    /// Binds an already computed selector to `handler`.
    pub const fn with_selector(selector: Selector, handler: Handler) -> Self {
        Self { selector, handler }
    }

    /// Returns the selector.
    pub const fn selector(&self) -> Selector {
        self.selector
    }

    /// Returns the handler.
    pub const fn handler(&self) -> Handler {
        self.handler
    }
}

/// A precompile that routes calls to handlers by function selector.
#[derive(Debug, Clone)]
pub struct StatefulPrecompile {
    address: Address,
    /// Functions in registration order.
    functions: Vec<PrecompileFunction>,
    /// Selector to position in `functions`.
    index: BTreeMap<Selector, usize>,
    fallback: Option<Handler>,
}

impl StatefulPrecompile {
    /// Builds the dispatch table.
    ///
    /// Fails if two functions share a selector.
    pub fn new(
        address: Address,
        functions: impl IntoIterator<Item = PrecompileFunction>,
        fallback: Option<Handler>,
    ) -> Result<Self, DispatchTableError> {
        let functions: Vec<_> = functions.into_iter().collect();
        let mut index = BTreeMap::new();
        for (position, function) in functions.iter().enumerate() {
            if index.insert(function.selector, position).is_some() {
                return Err(DispatchTableError::DuplicateSelector(function.selector));
            }
        }
        Ok(Self {
            address,
            functions,
            index,
            fallback,
        })
    }

    /// Returns the fixed address of the contract.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the handler registered for `selector`.
    pub fn handler(&self, selector: Selector) -> Option<Handler> {
        self.index
            .get(&selector)
            .map(|&position| self.functions[position].handler)
    }

    /// Returns the registered selectors in registration order.
    pub fn selectors(&self) -> impl Iterator<Item = Selector> + '_ {
        self.functions.iter().map(PrecompileFunction::selector)
    }

    /// Routes a call to the handler matching its selector.
    ///
    /// Empty input, input too short for a selector and unknown selectors go to the
    /// fallback when one is configured. Without a fallback they fail with the supplied
    /// gas left untouched and no state read or written.
    pub fn run<S: PrecompileState + ?Sized>(
        &self,
        state: &mut S,
        caller: Address,
        input: &[u8],
        gas: u64,
        read_only: bool,
    ) -> CallResult {
        let call = PrecompileCall {
            caller,
            address: self.address,
            input,
            gas,
            read_only,
        };

        let Some(selector) = input.get(..SELECTOR_LEN).map(Selector::from_slice) else {
            return match self.fallback {
                Some(fallback) => fallback.execute(state, &call),
                None => Err(MinterError::MissingSelector {
                    observed: input.len(),
                }
                .with_gas(gas)),
            };
        };

        match self.handler(selector).or(self.fallback) {
            Some(handler) => {
                tracing::debug!(target: "native_minter", %caller, %selector, ?handler, gas, read_only, "dispatching call");
                handler.execute(state, &call)
            }
            None => {
                tracing::debug!(target: "native_minter", %caller, %selector, "unmatched selector");
                Err(MinterError::UnmatchedOperation { selector }.with_gas(gas))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abi::{pack_address_input, INativeMinter},
        allow_list::READ_ALLOW_LIST_GAS_COST,
        test_utils::MemoryState,
    };
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;

    const CONTRACT: Address = address!("0x0200000000000000000000000000000000000001");
    const CALLER: Address = address!("0x00000000000000000000000000000000000000a1");

    fn read_only_table(fallback: Option<Handler>) -> StatefulPrecompile {
        StatefulPrecompile::new(
            CONTRACT,
            [PrecompileFunction::new(
                INativeMinter::readAllowListCall::SIGNATURE,
                Handler::ReadRole,
            )],
            fallback,
        )
        .expect("distinct selectors")
    }

    #[test]
    fn duplicate_selectors_fail_construction() {
        let result = StatefulPrecompile::new(
            CONTRACT,
            [
                PrecompileFunction::new("mint(address,uint256)", Handler::Mint),
                PrecompileFunction::new("setNone(address)", Handler::SetRole(Role::None)),
                PrecompileFunction::new("mint(address,uint256)", Handler::ReadRole),
            ],
            None,
        );

        assert_eq!(
            result.unwrap_err(),
            DispatchTableError::DuplicateSelector(function_selector("mint(address,uint256)"))
        );
    }

    #[test]
    fn selectors_keep_registration_order() {
        let signatures = ["readAllowList(address)", "mint(address,uint256)", "setNone(address)"];
        let table = StatefulPrecompile::new(
            CONTRACT,
            [
                PrecompileFunction::new(signatures[0], Handler::ReadRole),
                PrecompileFunction::new(signatures[1], Handler::Mint),
                PrecompileFunction::new(signatures[2], Handler::SetRole(Role::None)),
            ],
            None,
        )
        .expect("distinct selectors");

        let expected: Vec<_> = signatures.into_iter().map(function_selector).collect();
        assert_eq!(table.selectors().collect::<Vec<_>>(), expected);
        assert_eq!(table.handler(expected[1]), Some(Handler::Mint));
    }

    #[test]
    fn matched_selector_runs_handler_with_full_input() {
        let table = read_only_table(None);
        let mut state = MemoryState::default();
        let input = pack_address_input(
            Selector::from(INativeMinter::readAllowListCall::SELECTOR),
            CALLER,
        );

        let output = table
            .run(&mut state, CALLER, &input, 10_000, true)
            .expect("read allow list succeeds");

        assert_eq!(output.remaining_gas, 10_000 - READ_ALLOW_LIST_GAS_COST);
        assert_eq!(output.output.as_ref(), [0u8; 32].as_slice());
    }

    #[test]
    fn unmatched_selector_without_fallback_is_rejected() {
        let table = read_only_table(None);
        let mut state = MemoryState::default();
        let before = state.clone();
        let input = [0xde, 0xad, 0xbe, 0xef, 0x00];

        let failure = table
            .run(&mut state, CALLER, &input, 10_000, false)
            .expect_err("no function matches");

        assert_eq!(
            failure.error,
            MinterError::UnmatchedOperation {
                selector: Selector::from([0xde, 0xad, 0xbe, 0xef])
            }
        );
        assert_eq!(failure.remaining_gas, 10_000, "dispatch consumes no gas");
        assert_eq!(state, before, "dispatch failure must not touch state");
    }

    #[test]
    fn short_input_without_fallback_is_rejected() {
        let table = read_only_table(None);
        let mut state = MemoryState::default();

        for input in [&[][..], &[0x01, 0x02, 0x03][..]] {
            let failure = table
                .run(&mut state, CALLER, input, 7, false)
                .expect_err("no selector");
            assert_eq!(
                failure.error,
                MinterError::MissingSelector {
                    observed: input.len()
                }
            );
            assert_eq!(failure.remaining_gas, 7);
        }
    }

    #[test]
    fn fallback_handles_unmatched_and_empty_input() {
        let table = read_only_table(Some(Handler::ReadRole));
        let mut state = MemoryState::default();

        for input in [&[][..], &[0xde, 0xad, 0xbe, 0xef][..]] {
            let failure = table
                .run(&mut state, CALLER, input, 10_000, false)
                .expect_err("fallback rejects the payload");
            assert_eq!(
                failure.error,
                MinterError::InputLength { observed: 0 },
                "fallback ran instead of the unmatched error"
            );
            assert_eq!(failure.remaining_gas, 10_000 - READ_ALLOW_LIST_GAS_COST);
        }
    }

    #[test]
    fn table_exposes_registered_selectors() {
        let table = read_only_table(None);
        let selector = Selector::from(INativeMinter::readAllowListCall::SELECTOR);

        assert_eq!(table.address(), CONTRACT);
        assert_eq!(table.handler(selector), Some(Handler::ReadRole));
        assert_eq!(table.selectors().collect::<Vec<_>>(), vec![selector]);
    }
}
