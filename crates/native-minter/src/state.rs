//! Ledger access used by the precompile handlers.
//!
//! Handlers never touch the journal directly. Everything they need from the ledger goes
//! through [`PrecompileState`], which keeps the handlers testable against an in-memory
//! ledger and lets the EVM integration provide the journal-backed implementation.

use crate::error::MinterError;
use alloy_evm::{EvmInternals, EvmInternalsError};
use alloy_primitives::{Address, Bytes, U256};
use revm::{bytecode::Bytecode, state::Account};
use std::sync::OnceLock;

/// Narrow accessor over account existence, balances and contract storage.
pub trait PrecompileState {
    /// Returns whether `address` exists in the ledger.
    fn account_exists(&mut self, address: Address) -> Result<bool, MinterError>;

    /// Materializes an empty account at `address`.
    fn create_account(&mut self, address: Address) -> Result<(), MinterError>;

    /// Returns the balance of `address`, zero for absent accounts.
    fn balance_of(&mut self, address: Address) -> Result<U256, MinterError>;

    /// Overwrites the balance of `address`.
    fn set_account_balance(&mut self, address: Address, balance: U256)
        -> Result<(), MinterError>;

    /// Reads a storage word of the contract at `address`, zero if never written.
    fn storage_at(&mut self, address: Address, slot: U256) -> Result<U256, MinterError>;

    /// Writes a storage word of the contract at `address`.
    fn set_storage_at(
        &mut self,
        address: Address,
        slot: U256,
        value: U256,
    ) -> Result<(), MinterError>;

    /// Credits `amount` to `address`, failing instead of wrapping on overflow.
    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), MinterError> {
        let new_balance = self
            .balance_of(address)?
            .checked_add(amount)
            .ok_or(MinterError::BalanceOverflow)?;
        self.set_account_balance(address, new_balance)
    }
}

fn map_internals_error(err: EvmInternalsError) -> MinterError {
    MinterError::State(err.to_string())
}

/// Code installed on the precompile account the first time it receives storage.
///
/// The invalid opcode keeps the account from being pruned as empty while making sure it
/// is never executed as a regular contract.
fn precompile_bytecode() -> &'static Bytecode {
    static BYTECODE: OnceLock<Bytecode> = OnceLock::new();
    BYTECODE.get_or_init(|| Bytecode::new_raw(Bytes::from_static(&[0xFE])))
}

impl PrecompileState for EvmInternals<'_> {
    fn account_exists(&mut self, address: Address) -> Result<bool, MinterError> {
        let account = Self::load_account(self, address).map_err(map_internals_error)?;
        Ok(account_is_live(account.data))
    }

    fn create_account(&mut self, address: Address) -> Result<(), MinterError> {
        Self::touch_account(self, address).map_err(map_internals_error)
    }

    fn balance_of(&mut self, address: Address) -> Result<U256, MinterError> {
        let account = Self::load_account(self, address).map_err(map_internals_error)?;
        Ok(account.info.balance)
    }

    fn set_account_balance(
        &mut self,
        address: Address,
        balance: U256,
    ) -> Result<(), MinterError> {
        // set_balance touches the account
        Self::set_balance(self, address, balance).map_err(map_internals_error)
    }

    fn storage_at(&mut self, address: Address, slot: U256) -> Result<U256, MinterError> {
        let value = Self::sload(self, address, slot).map_err(map_internals_error)?;
        Ok(value.data)
    }

    fn set_storage_at(
        &mut self,
        address: Address,
        slot: U256,
        value: U256,
    ) -> Result<(), MinterError> {
        let is_empty = Self::load_account(self, address)
            .map_err(map_internals_error)?
            .is_empty();
        if is_empty {
            Self::set_code(self, address, precompile_bytecode().clone())
                .map_err(map_internals_error)?;
        }
        Self::sstore(self, address, slot, value).map_err(map_internals_error)?;
        Self::touch_account(self, address).map_err(map_internals_error)
    }
}

/// Whether a journaled account counts as existing.
///
/// Accounts the database did not know about still exist once this transaction created
/// them or left them touched and non-empty, e.g. after receiving a transfer.
fn account_is_live(account: &Account) -> bool {
    !account.is_loaded_as_not_existing()
        || account.is_created()
        || (account.is_touched() && !account.is_empty())
}
