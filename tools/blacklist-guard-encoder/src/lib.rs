//! Off-chain encoding helpers for operating the blacklist guard.
//!
//! Builds the mutator calldata and relay request payloads the guard's
//! entry points expect, including the `ExecParams` byte blob and the Safe
//! transaction digest/signature an avatar demands for `execTransaction`.

pub mod encoder;
pub mod safe_tx;


pub use encoder::{
    encode_exec_params, function_selector, request_set_exceptional_sender_calldata,
    request_set_target_calldata, set_exceptional_sender_calldata, set_target_calldata,
};
pub use safe_tx::{safe_tx_digest, sign_safe_tx, signer_address, SafeTx};
