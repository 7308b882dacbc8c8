use alloy_primitives::{Address, Selector};
use thiserror::Error;

/// Failure reasons surfaced by the native minter precompile.
///
/// Every failure is forwarded verbatim to the EVM, which treats it as a revert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinterError {
    /// The call ran out of gas at a metering checkpoint.
    #[error("out of gas: needed {needed}, have {have}")]
    OutOfGas {
        /// Gas required by the checkpoint.
        needed: u64,
        /// Gas reported as available at the checkpoint.
        have: u64,
    },
    /// A state-mutating function was invoked from a read-only call.
    #[error("write protection")]
    WriteProtection,
    /// The argument payload after the selector has the wrong length.
    #[error("invalid input length: {observed}")]
    InputLength {
        /// Observed payload length in bytes.
        observed: usize,
    },
    /// The caller is not enabled on the allow-list.
    #[error("non-enabled cannot mint: {caller}")]
    PermissionDenied {
        /// The rejected caller.
        caller: Address,
    },
    /// The caller is not an allow-list admin.
    #[error("non-admin cannot modify allow list: {caller}")]
    CannotModifyAllowList {
        /// The rejected caller.
        caller: Address,
    },
    /// No function matches the selector and the contract has no fallback.
    #[error("invalid function selector {selector}")]
    UnmatchedOperation {
        /// The selector read from the input.
        selector: Selector,
    },
    /// The input is too short to carry a selector and the contract has no fallback.
    #[error("missing function selector to precompile - input length ({observed})")]
    MissingSelector {
        /// Observed input length in bytes.
        observed: usize,
    },
    /// Crediting the amount would overflow the account balance.
    #[error("balance overflow")]
    BalanceOverflow,
    /// The ledger accessor failed.
    #[error("state access failed: {0}")]
    State(String),
}

impl MinterError {
    /// Pairs the error with the gas left at the failing checkpoint.
    pub fn with_gas(self, remaining_gas: u64) -> CallFailure {
        CallFailure {
            error: self,
            remaining_gas,
        }
    }
}

/// A failed precompile call together with the gas it leaves to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct CallFailure {
    /// The failure reason.
    pub error: MinterError,
    /// Gas remaining after the failing checkpoint.
    pub remaining_gas: u64,
}

/// Errors raised while assembling a dispatch table at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchTableError {
    /// Two functions were registered under the same selector.
    #[error("duplicate function selector {0}")]
    DuplicateSelector(Selector),
}
