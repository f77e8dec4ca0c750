//! Safe transaction digest computation and signing.
//!
//! `execTransaction` submissions (and therefore relay requests) need
//! signatures over the avatar's EIP-712 `SafeTx` digest. The typed-data
//! hashing is hand-rolled so the tool stays free of a full EIP-712
//! implementation.

use alloy_primitives::{Address, FixedBytes, U256};
use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};

/// One avatar transaction as covered by the `SafeTx` typed message.
#[derive(Clone, Debug)]
pub struct SafeTx {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub operation: u8,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
}

/// Compute the EIP-712 digest the avatar expects signatures over.
pub fn safe_tx_digest(chain_id: u64, avatar: Address, tx: &SafeTx) -> FixedBytes<32> {
    // keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
    let domain_type_hash =
        keccak256(b"EIP712Domain(uint256 chainId,address verifyingContract)");
    let mut domain_buf = Vec::with_capacity(32 * 3);
    domain_buf.extend_from_slice(&domain_type_hash);
    domain_buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    domain_buf.extend_from_slice(&address_word(avatar));
    let domain_separator = keccak256(&domain_buf);

    let tx_type_hash = keccak256(
        b"SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)",
    );

    // Dynamic `bytes data` enters the struct hash as keccak256(data).
    let mut struct_buf = Vec::with_capacity(32 * 11);
    struct_buf.extend_from_slice(&tx_type_hash);
    struct_buf.extend_from_slice(&address_word(tx.to));
    struct_buf.extend_from_slice(&tx.value.to_be_bytes::<32>());
    struct_buf.extend_from_slice(&keccak256(&tx.data));
    let mut op_word = [0u8; 32];
    op_word[31] = tx.operation;
    struct_buf.extend_from_slice(&op_word);
    struct_buf.extend_from_slice(&tx.safe_tx_gas.to_be_bytes::<32>());
    struct_buf.extend_from_slice(&tx.base_gas.to_be_bytes::<32>());
    struct_buf.extend_from_slice(&tx.gas_price.to_be_bytes::<32>());
    struct_buf.extend_from_slice(&address_word(tx.gas_token));
    struct_buf.extend_from_slice(&address_word(tx.refund_receiver));
    struct_buf.extend_from_slice(&tx.nonce.to_be_bytes::<32>());
    let struct_hash = keccak256(&struct_buf);

    // keccak256("\x19\x01" || domainSeparator || structHash)
    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(&domain_separator);
    final_buf.extend_from_slice(&struct_hash);
    FixedBytes(keccak256(&final_buf))
}

/// Produce the 65-byte `r || s || v` signature (v in {27, 28}) over a
/// precomputed digest.
pub fn sign_safe_tx(
    digest: FixedBytes<32>,
    key: &SigningKey,
) -> Result<[u8; 65], k256::ecdsa::Error> {
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest.as_slice())?;
    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recovery_id.to_byte();
    Ok(out)
}

/// Ethereum address of the key's public half.
pub fn signer_address(key: &SigningKey) -> Address {
    let encoded = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

fn address_word(addr: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr.as_slice());
    word
}
