use alloy_primitives::{Address, FixedBytes};

/// Read-only view over the per-target policy records.
///
/// Targets that were never written answer `false`/`None` everywhere.
pub trait PolicyLookup {
    /// Target address is wholly unreachable.
    fn is_all_blocked(&self, target: Address) -> bool;

    /// Delegate calls to the target are disallowed.
    fn is_delegate_call_blocked(&self, target: Address) -> bool;

    /// The 4-byte selector is blocked for calls to the target.
    fn is_function_blocked(&self, target: Address, selector: FixedBytes<4>) -> bool;

    /// The single sender allowed past the selector check for this target.
    fn exceptional_sender(&self, target: Address) -> Option<Address>;
}
