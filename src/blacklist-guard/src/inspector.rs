//! Pre-execution transaction inspection.
//!
//! Pure decision procedure over a [`PolicyLookup`] view; the contract feeds
//! it storage, tests feed it stubs.

use stylus_sdk::alloy_primitives::{Address, FixedBytes};

use blacklist_guard_types::{Operation, PolicyLookup};

use crate::errors::RejectReason;

/// Decide whether the avatar may execute a proposed transaction.
///
/// First match wins:
/// 1. target wholly blocked
/// 2. delegatecall to a delegatecall-blocked target
/// 3. nonempty `data`: shorter than a selector, or a blocked selector
///    (unless `executing_sender` is the target's exceptional sender)
/// 4. everything else passes, including empty-data value transfers
///
/// The exceptional sender bypasses only the selector check, never rules 1–2.
pub fn check_transaction<P: PolicyLookup>(
    policy: &P,
    to: Address,
    data: &[u8],
    operation: Operation,
    executing_sender: Address,
) -> Result<(), RejectReason> {
    if policy.is_all_blocked(to) {
        return Err(RejectReason::TargetAddressBlocked);
    }

    if operation == Operation::DelegateCall && policy.is_delegate_call_blocked(to) {
        return Err(RejectReason::DelegateCallNotAllowed);
    }

    if !data.is_empty() {
        if data.len() < 4 {
            return Err(RejectReason::FunctionSignatureTooShort);
        }
        let selector = FixedBytes::<4>::from_slice(&data[..4]);
        if policy.is_function_blocked(to, selector)
            && policy.exceptional_sender(to) != Some(executing_sender)
        {
            return Err(RejectReason::FunctionCallBlocked);
        }
    }

    Ok(())
}
