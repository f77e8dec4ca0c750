use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

sol! {
    /// Caller holds no rights on the entry point it hit.
    error Unauthorized(string reason);
    /// `setUp` ran before.
    error AlreadyInitialized();
    /// The owner may not be the zero address.
    error InvalidOwner();
    /// Malformed `setUp` parameter bytes.
    error InvalidParameters();
    /// Malformed execution-parameter bytes on a relay request.
    error InvalidExecParams();
    /// Operation byte is neither call (0) nor delegatecall (1).
    error InvalidOperation();
    /// The avatar refused the relayed request submission.
    error RequestNotAccepted();

    // Transaction-check rejections. Routine policy denials, not bugs.

    /// "Target address is blocked"
    error TargetAddressBlocked();
    /// "Delegate call not allowed to this address"
    error DelegateCallNotAllowed();
    /// "Function signature too short"
    error FunctionSignatureTooShort();
    /// "The function call to the target is blocked"
    error FunctionCallBlocked();
}

#[derive(SolidityError)]
pub enum GuardError {
    Unauthorized(Unauthorized),
    AlreadyInitialized(AlreadyInitialized),
    InvalidOwner(InvalidOwner),
    InvalidParameters(InvalidParameters),
    InvalidExecParams(InvalidExecParams),
    InvalidOperation(InvalidOperation),
    RequestNotAccepted(RequestNotAccepted),
    TargetAddressBlocked(TargetAddressBlocked),
    DelegateCallNotAllowed(DelegateCallNotAllowed),
    FunctionSignatureTooShort(FunctionSignatureTooShort),
    FunctionCallBlocked(FunctionCallBlocked),
}

/// Rejections produced by the pure transaction inspector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    TargetAddressBlocked,
    DelegateCallNotAllowed,
    FunctionSignatureTooShort,
    FunctionCallBlocked,
}

impl From<RejectReason> for GuardError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::TargetAddressBlocked => {
                GuardError::TargetAddressBlocked(TargetAddressBlocked {})
            }
            RejectReason::DelegateCallNotAllowed => {
                GuardError::DelegateCallNotAllowed(DelegateCallNotAllowed {})
            }
            RejectReason::FunctionSignatureTooShort => {
                GuardError::FunctionSignatureTooShort(FunctionSignatureTooShort {})
            }
            RejectReason::FunctionCallBlocked => {
                GuardError::FunctionCallBlocked(FunctionCallBlocked {})
            }
        }
    }
}
