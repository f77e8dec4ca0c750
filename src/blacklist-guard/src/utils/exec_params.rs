//! Parsing of the relay's execution-parameter bytes.
//!
//! The layout is documented on [`ExecParams`]; integers are big-endian and
//! trailing bytes are rejected for determinism.

use blacklist_guard_types::ExecParams;

use crate::utils::bytes::{read_address, read_u16_be, read_u256_be, read_vec};

/// Fixed-size prefix: three u256 words, two addresses, the signature length.
const MIN_LEN: usize = 32 + 32 + 32 + 20 + 20 + 2;

pub fn parse_exec_params(data: &[u8]) -> Result<ExecParams, ()> {
    if data.len() < MIN_LEN {
        return Err(());
    }

    let mut i = 0usize;
    let safe_tx_gas = read_u256_be(data, &mut i)?;
    let base_gas = read_u256_be(data, &mut i)?;
    let gas_price = read_u256_be(data, &mut i)?;
    let gas_token = read_address(data, &mut i)?;
    let refund_receiver = read_address(data, &mut i)?;
    let sig_len = read_u16_be(data, &mut i)? as usize;
    let signatures = read_vec(data, &mut i, sig_len)?;
    if i != data.len() {
        return Err(());
    }

    Ok(ExecParams {
        safe_tx_gas,
        base_gas,
        gas_price,
        gas_token,
        refund_receiver,
        signatures,
    })
}
