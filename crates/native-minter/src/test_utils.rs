//! In-memory ledger for exercising handlers without an EVM.

use crate::{error::MinterError, state::PrecompileState};
use alloy_primitives::{Address, U256};
use std::collections::{BTreeMap, BTreeSet};

/// A ledger backed by plain maps.
///
/// Reads never mutate, so comparing two snapshots tells whether a call wrote anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryState {
    accounts: BTreeSet<Address>,
    balances: BTreeMap<Address, U256>,
    storage: BTreeMap<(Address, U256), U256>,
}

impl MemoryState {
    /// Inserts an existing account holding `balance`.
    pub fn insert_account(&mut self, address: Address, balance: U256) {
        self.accounts.insert(address);
        self.balances.insert(address, balance);
    }

    /// Returns whether the account exists.
    pub fn exists(&self, address: Address) -> bool {
        self.accounts.contains(&address)
    }

    /// Returns the balance of the account, zero if absent.
    pub fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }
}

impl PrecompileState for MemoryState {
    fn account_exists(&mut self, address: Address) -> Result<bool, MinterError> {
        Ok(self.exists(address))
    }

    fn create_account(&mut self, address: Address) -> Result<(), MinterError> {
        self.accounts.insert(address);
        Ok(())
    }

    fn balance_of(&mut self, address: Address) -> Result<U256, MinterError> {
        Ok(self.balance(address))
    }

    fn set_account_balance(
        &mut self,
        address: Address,
        balance: U256,
    ) -> Result<(), MinterError> {
        self.accounts.insert(address);
        self.balances.insert(address, balance);
        Ok(())
    }

    fn storage_at(&mut self, address: Address, slot: U256) -> Result<U256, MinterError> {
        Ok(self
            .storage
            .get(&(address, slot))
            .copied()
            .unwrap_or_default())
    }

    fn set_storage_at(
        &mut self,
        address: Address,
        slot: U256,
        value: U256,
    ) -> Result<(), MinterError> {
        self.accounts.insert(address);
        self.storage.insert((address, slot), value);
        Ok(())
    }
}
