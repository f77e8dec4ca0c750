use alloy_primitives::{Address, FixedBytes, U256};
use sha3::{Digest, Keccak256};

use blacklist_guard_types::ExecParams;

/// Encode the relay execution-parameter blob the guard parses on-chain.
///
/// Mirror image of the guard's parser: big-endian integers, raw addresses,
/// length-prefixed signatures, no trailing bytes.
pub fn encode_exec_params(params: &ExecParams) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 * 3 + 20 * 2 + 2 + params.signatures.len());
    out.extend_from_slice(&params.safe_tx_gas.to_be_bytes::<32>());
    out.extend_from_slice(&params.base_gas.to_be_bytes::<32>());
    out.extend_from_slice(&params.gas_price.to_be_bytes::<32>());
    out.extend_from_slice(params.gas_token.as_slice());
    out.extend_from_slice(params.refund_receiver.as_slice());
    out.extend_from_slice(&(params.signatures.len() as u16).to_be_bytes());
    out.extend_from_slice(&params.signatures);
    out
}

/// Calldata for `setTarget(address,bool,bool,bytes4,bool)`.
pub fn set_target_calldata(
    target: Address,
    block_all: bool,
    block_delegate_call: bool,
    function_signature: FixedBytes<4>,
    block_function: bool,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 32 * 5);
    out.extend_from_slice(&selector("setTarget(address,bool,bool,bytes4,bool)"));
    out.extend_from_slice(&address_word(target));
    out.extend_from_slice(&bool_word(block_all));
    out.extend_from_slice(&bool_word(block_delegate_call));
    out.extend_from_slice(&bytes4_word(function_signature));
    out.extend_from_slice(&bool_word(block_function));
    out
}

/// Calldata for `setExceptionalSender(address,address)`.
pub fn set_exceptional_sender_calldata(target: Address, sender: Address) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 32 * 2);
    out.extend_from_slice(&selector("setExceptionalSender(address,address)"));
    out.extend_from_slice(&address_word(target));
    out.extend_from_slice(&address_word(sender));
    out
}

/// Calldata for `requestSetTarget(address,bool,bool,bytes4,bool,bytes)`.
pub fn request_set_target_calldata(
    target: Address,
    block_all: bool,
    block_delegate_call: bool,
    function_signature: FixedBytes<4>,
    block_function: bool,
    exec_params: &ExecParams,
) -> Vec<u8> {
    let blob = encode_exec_params(exec_params);
    let mut out = Vec::with_capacity(4 + 32 * 7 + padded_len(blob.len()));
    out.extend_from_slice(&selector(
        "requestSetTarget(address,bool,bool,bytes4,bool,bytes)",
    ));
    out.extend_from_slice(&address_word(target));
    out.extend_from_slice(&bool_word(block_all));
    out.extend_from_slice(&bool_word(block_delegate_call));
    out.extend_from_slice(&bytes4_word(function_signature));
    out.extend_from_slice(&bool_word(block_function));
    // Offset of the dynamic tail: six head words.
    out.extend_from_slice(&U256::from(32 * 6).to_be_bytes::<32>());
    append_bytes_tail(&mut out, &blob);
    out
}

/// Calldata for `requestSetExceptionalSender(address,address,bytes)`.
pub fn request_set_exceptional_sender_calldata(
    target: Address,
    sender: Address,
    exec_params: &ExecParams,
) -> Vec<u8> {
    let blob = encode_exec_params(exec_params);
    let mut out = Vec::with_capacity(4 + 32 * 4 + padded_len(blob.len()));
    out.extend_from_slice(&selector("requestSetExceptionalSender(address,address,bytes)"));
    out.extend_from_slice(&address_word(target));
    out.extend_from_slice(&address_word(sender));
    out.extend_from_slice(&U256::from(32 * 3).to_be_bytes::<32>());
    append_bytes_tail(&mut out, &blob);
    out
}

/// 4-byte selector of a human-readable function signature, e.g.
/// `"transfer(address,uint256)"`. Operators pass signatures; the guard
/// stores selectors.
pub fn function_selector(sig: &str) -> FixedBytes<4> {
    FixedBytes(selector(sig))
}

fn selector(sig: &str) -> [u8; 4] {
    let hash = Keccak256::digest(sig.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn address_word(addr: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr.as_slice());
    word
}

fn bool_word(value: bool) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[31] = value as u8;
    word
}

// `bytesN` values sit left-aligned in their ABI word.
fn bytes4_word(value: FixedBytes<4>) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[..4].copy_from_slice(value.as_slice());
    word
}

fn padded_len(len: usize) -> usize {
    32 + len.div_ceil(32) * 32
}

fn append_bytes_tail(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    out.extend_from_slice(data);
    let rem = data.len() % 32;
    if rem != 0 {
        out.extend_from_slice(&[0u8; 32][..32 - rem]);
    }
}
