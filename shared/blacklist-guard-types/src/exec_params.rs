use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// Avatar execution parameters carried alongside a relay request.
///
/// The relay passes these through to the avatar's `execTransaction`
/// interface without interpreting them; what a valid `signatures` blob
/// looks like is entirely the avatar's business.
///
/// Wire layout (big-endian integers, no trailing bytes):
/// - `u256 safe_tx_gas`
/// - `u256 base_gas`
/// - `u256 gas_price`
/// - `bytes20 gas_token`
/// - `bytes20 refund_receiver`
/// - `u16 signatures_len`
/// - `bytes signatures`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecParams {
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub signatures: Vec<u8>,
}
