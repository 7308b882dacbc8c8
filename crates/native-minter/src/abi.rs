//! Calling convention of the native minter.
//!
//! Calls are `selector ∥ payload`, where the selector is the first four bytes of the
//! keccak hash of the canonical function signature and the payload is a sequence of
//! 32-byte words.

use crate::{allow_list::Role, error::MinterError};
use alloy_primitives::{keccak256, Address, Bytes, Selector, B256, U256};
use alloy_sol_types::{sol, SolCall};

sol! {
    /// Native minter and allow-list interface.
    interface INativeMinter {
        /// Mint `amount` of the native token to `addr`.
        function mint(address addr, uint256 amount);

        /// Grant the admin role to `addr`.
        function setAdmin(address addr);

        /// Grant the enabled role to `addr`.
        function setEnabled(address addr);

        /// Revoke every role of `addr`.
        function setNone(address addr);

        /// Read the role of `addr`.
        function readAllowList(address addr) external view returns (uint256 role);
    }
}

/// Length of a function selector.
pub const SELECTOR_LEN: usize = 4;

/// Length of one ABI word.
pub const WORD_LEN: usize = 32;

/// Payload length expected by `mint`: address word plus amount word.
pub const MINT_INPUT_LEN: usize = WORD_LEN + WORD_LEN;

/// Payload length expected by the allow-list functions: a single address word.
pub const ALLOW_LIST_INPUT_LEN: usize = WORD_LEN;

/// Computes the selector of a canonical signature such as `mint(address,uint256)`.
pub fn function_selector(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes())[..SELECTOR_LEN])
}

/// Returns the argument payload that follows the selector.
fn payload(input: &[u8]) -> &[u8] {
    input.get(SELECTOR_LEN..).unwrap_or_default()
}

/// Packs a `mint` call.
///
/// The amount is appended as its minimal big-endian representation and is not padded
/// to a full word. Only amounts whose minimal form already spans 32 bytes produce
/// input that [`unpack_mint_input`] accepts; callers that need a decodable payload for
/// any amount should use the standard ABI encoding of [`INativeMinter::mintCall`].
pub fn pack_mint_input(to: Address, amount: U256) -> Bytes {
    let amount = amount.to_be_bytes_trimmed_vec();
    let mut input = Vec::with_capacity(SELECTOR_LEN + WORD_LEN + amount.len());
    input.extend_from_slice(&INativeMinter::mintCall::SELECTOR);
    input.extend_from_slice(to.into_word().as_slice());
    input.extend_from_slice(&amount);
    input.into()
}

/// Unpacks the recipient and amount of a `mint` call.
///
/// `input` is the full call data. The payload after the selector must be exactly
/// [`MINT_INPUT_LEN`] bytes.
pub fn unpack_mint_input(input: &[u8]) -> Result<(Address, U256), MinterError> {
    let args = payload(input);
    if args.len() != MINT_INPUT_LEN {
        return Err(MinterError::InputLength {
            observed: args.len(),
        });
    }
    let to = Address::from_word(B256::from_slice(&args[..WORD_LEN]));
    let amount = U256::from_be_slice(&args[WORD_LEN..]);
    Ok((to, amount))
}

/// Packs an allow-list call that takes a single address.
pub fn pack_address_input(selector: Selector, address: Address) -> Bytes {
    let mut input = Vec::with_capacity(SELECTOR_LEN + ALLOW_LIST_INPUT_LEN);
    input.extend_from_slice(selector.as_slice());
    input.extend_from_slice(address.into_word().as_slice());
    input.into()
}

/// Unpacks the address argument of an allow-list call.
pub fn unpack_address_input(input: &[u8]) -> Result<Address, MinterError> {
    let args = payload(input);
    if args.len() != ALLOW_LIST_INPUT_LEN {
        return Err(MinterError::InputLength {
            observed: args.len(),
        });
    }
    Ok(Address::from_word(B256::from_slice(args)))
}

/// Encodes a role as the 32-byte big-endian word returned by `readAllowList`.
pub fn encode_role(role: Role) -> Bytes {
    Bytes::copy_from_slice(B256::from(role.to_word()).as_slice())
}
