//! # Native Minter Precompile
//!
//! A stateful precompile that lets allow-listed callers mint the native token directly
//! into account balances.
//!
//! ## Interface
//!
//! The precompile lives at [`NATIVE_MINTER_ADDRESS`] (`0x0200…0001`).
//!
//! | Function | Gas | Caller role |
//! |----------|-----|-------------|
//! | `mint(address,uint256)` | 30 000 (+25 000 for a new account) | Enabled or Admin |
//! | `setAdmin(address)` | 20 000 | Admin |
//! | `setEnabled(address)` | 20 000 | Admin |
//! | `setNone(address)` | 20 000 | Admin |
//! | `readAllowList(address)` | 5 000 | any |
//!
//! ## Architecture
//!
//! 1. **Codec** ([`abi`]): selectors and argument packing
//! 2. **Allow-list** ([`allow_list`]): `None < Enabled < Admin` roles stored in the
//!    precompile account
//! 3. **Dispatch** ([`contract`]): immutable selector table built once at startup
//! 4. **Mint** ([`mint`]): gas, read-only, permission, account creation, credit
//! 5. **Integration** ([`precompile`]): `alloy-evm` precompile adapter backed by
//!    `EvmInternals`
//!
//! Handlers reach the ledger only through [`PrecompileState`]. Rolling back writes of a
//! failed call is left to the EVM journal.
//!
//! ## Integration
//!
//! ```ignore
//! use native_minter::{install_native_minter, parse_native_minter_config};
//!
//! let config = parse_native_minter_config(&genesis_extras)?;
//! install_native_minter(&mut evm.precompiles_mut(), &config)?;
//! ```

pub mod abi;
pub mod allow_list;
pub mod config;
pub mod contract;
pub mod error;
pub mod mint;
pub mod precompile;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use allow_list::Role;
pub use config::{
    parse_native_minter_config, ConfigError, NativeMinterConfig, NATIVE_MINTER_ADDRESS,
};
pub use contract::{CallOutput, CallResult, Handler, PrecompileCall, StatefulPrecompile};
pub use error::{CallFailure, DispatchTableError, MinterError};
pub use precompile::{install_native_minter, NativeMinterPrecompile};
pub use state::PrecompileState;
