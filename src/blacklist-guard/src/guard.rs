//! Stylus-based blacklist **guard** for a Zodiac-style avatar.
//!
//! The avatar consults `checkTransaction` before every transaction it
//! executes; the guard answers against per-target blacklist records and
//! otherwise stays out of the way.
//!
//! Design notes:
//! - Policy records are written only through the guarded setters, either
//!   directly (owner / avatar) or via the request relay, which routes the
//!   change back through the avatar's own `execTransaction` path so every
//!   policy change is subject to the avatar's execution semantics
//!   (signature thresholds, delays).
//! - The avatar's upstream owner may *request* changes without holding
//!   owner rights on the guard; whether the change lands synchronously or
//!   through a delayed executor is the avatar's wiring, not the relay's.
//! - `setTarget` overwrites both boolean flags on every call. Callers pass
//!   the intended final state, not a delta.

use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes, U256},
    call::RawCall,
    evm,
    prelude::*,
    ArbResult,
};

use alloy_sol_types::{sol, SolCall, SolValue};

use blacklist_guard_types::{Operation, PolicyLookup};

use crate::{
    errors::{
        AlreadyInitialized, GuardError, InvalidExecParams, InvalidOperation, InvalidOwner,
        InvalidParameters, RequestNotAccepted, Unauthorized,
    },
    inspector,
    utils::exec_params::parse_exec_params,
    zodiac::interfaces::{IAvatar, IBlacklistGuard, IOwnable},
};

sol! {
    event GuardSetup(address indexed initiator, address indexed owner, address indexed avatar, address executor);
    event SetTarget(address indexed target, bool allBlocked, bool delegateCallBlocked, bytes4 functionSignature, bool functionBlocked);
    event SetExceptionalSender(address indexed target, address sender);
    event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
}

sol_storage! {
    /// Per-target policy record (created lazily; defaults fully permissive).
    pub struct Target {
        bool all_blocked;
        bool delegate_call_blocked;
        /// Selector membership is the source of truth for per-function blocks.
        mapping(bytes4 => bool) blocked_functions;
    }

    #[entrypoint]
    pub struct BlacklistGuard {
        bool initialized;

        /// Administrative principal; zero encodes "renounced".
        address owner;
        /// The governed account. Immutable after `setUp`.
        address avatar;
        /// Address expected to deliver the second half of a relayed request.
        address executor;

        mapping(address => Target) targets;
        /// Per-target sender allowed past the selector check; zero = none.
        mapping(address => address) exceptional_senders;
    }
}

#[public]
impl BlacklistGuard {
    /// One-time initialization.
    ///
    /// `initialize_params` is ABI-encoded `(address owner, address avatar,
    /// address executor)`. The avatar and executor are fixed for the life
    /// of the guard; ownership can later be transferred or renounced.
    pub fn set_up(&mut self, initialize_params: Vec<u8>) -> Result<(), GuardError> {
        if self.initialized.get() {
            return Err(GuardError::AlreadyInitialized(AlreadyInitialized {}));
        }
        let (owner, avatar, executor) =
            <(Address, Address, Address)>::abi_decode_params(&initialize_params, true)
                .map_err(|_| GuardError::InvalidParameters(InvalidParameters {}))?;
        if owner == Address::ZERO {
            return Err(GuardError::InvalidOwner(InvalidOwner {}));
        }

        self.initialized.set(true);
        self.owner.set(owner);
        self.avatar.set(avatar);
        self.executor.set(executor);

        evm::log(
            self.vm(),
            GuardSetup {
                initiator: self.vm().msg_sender(),
                owner,
                avatar,
                executor,
            },
        );
        Ok(())
    }

    /// Pre-execution hook consulted by the avatar for every transaction.
    ///
    /// Reverts with the rejection reason, or returns cleanly to allow.
    /// Read-only; gas-related fields and signatures are the avatar's
    /// business and are not inspected.
    #[allow(clippy::too_many_arguments)]
    pub fn check_transaction(
        &self,
        to: Address,
        _value: U256,
        data: Vec<u8>,
        operation: u8,
        _safe_tx_gas: U256,
        _base_gas: U256,
        _gas_price: U256,
        _gas_token: Address,
        _refund_receiver: Address,
        _signatures: Vec<u8>,
        msg_sender: Address,
    ) -> Result<(), GuardError> {
        let operation = Operation::try_from(operation)
            .map_err(|_| GuardError::InvalidOperation(InvalidOperation {}))?;
        inspector::check_transaction(self, to, &data, operation, msg_sender)?;
        Ok(())
    }

    /// Post-execution hook. No policy logic; must not revert.
    pub fn check_after_execution(&self, _tx_hash: FixedBytes<32>, _success: bool) {}

    /// Overwrite a target's whole-target and delegatecall flags and toggle
    /// membership of one selector in its blocked set.
    pub fn set_target(
        &mut self,
        target: Address,
        block_all: bool,
        block_delegate_call: bool,
        function_signature: FixedBytes<4>,
        block_function: bool,
    ) -> Result<(), GuardError> {
        self.require_owner_or_avatar()?;
        {
            let mut record = self.targets.setter(target);
            record.all_blocked.set(block_all);
            record.delegate_call_blocked.set(block_delegate_call);
            record
                .blocked_functions
                .insert(function_signature, block_function);
        }
        evm::log(
            self.vm(),
            SetTarget {
                target,
                allBlocked: block_all,
                delegateCallBlocked: block_delegate_call,
                functionSignature: function_signature,
                functionBlocked: block_function,
            },
        );
        Ok(())
    }

    /// Overwrite the single sender allowed past a target's selector check.
    ///
    /// Owner-only: this is the narrow escape hatch that lets the executor
    /// relay update the guard's own policy while the guard blocks its own
    /// mutating selectors against the avatar.
    pub fn set_exceptional_sender(
        &mut self,
        target: Address,
        sender: Address,
    ) -> Result<(), GuardError> {
        self.require_owner()?;
        self.exceptional_senders.insert(target, sender);
        evm::log(self.vm(), SetExceptionalSender { target, sender });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<(), GuardError> {
        self.require_owner()?;
        if new_owner == Address::ZERO {
            return Err(GuardError::InvalidOwner(InvalidOwner {}));
        }
        let previous = self.owner.get();
        self.owner.set(new_owner);
        evm::log(
            self.vm(),
            OwnershipTransferred {
                previousOwner: previous,
                newOwner: new_owner,
            },
        );
        Ok(())
    }

    /// Permanently give up ownership. Owner-gated entry points become
    /// unreachable; avatar-gated ones and stored policy stay live.
    pub fn renounce_ownership(&mut self) -> Result<(), GuardError> {
        self.require_owner()?;
        let previous = self.owner.get();
        self.owner.set(Address::ZERO);
        evm::log(
            self.vm(),
            OwnershipTransferred {
                previousOwner: previous,
                newOwner: Address::ZERO,
            },
        );
        Ok(())
    }

    /// Request a `setTarget` change through the avatar's own execution
    /// path. Depending on the avatar's wiring the change lands within this
    /// call or only once the executor delivers it; the relay itself stores
    /// nothing and must not assume synchronous completion.
    #[allow(clippy::too_many_arguments)]
    pub fn request_set_target(
        &mut self,
        target: Address,
        block_all: bool,
        block_delegate_call: bool,
        function_signature: FixedBytes<4>,
        block_function: bool,
        exec_params: Vec<u8>,
    ) -> Result<(), GuardError> {
        self.require_avatars_owner_or_owner()?;
        let callback = IBlacklistGuard::setTargetCall {
            target,
            blockAll: block_all,
            blockDelegateCall: block_delegate_call,
            functionSignature: function_signature,
            blockFunction: block_function,
        }
        .abi_encode();
        self.submit_to_avatar(callback, &exec_params)
    }

    /// Same shape as [`Self::request_set_target`], for the exceptional
    /// sender override.
    pub fn request_set_exceptional_sender(
        &mut self,
        target: Address,
        sender: Address,
        exec_params: Vec<u8>,
    ) -> Result<(), GuardError> {
        self.require_avatars_owner_or_owner()?;
        let callback = IBlacklistGuard::setExceptionalSenderCall { target, sender }.abi_encode();
        self.submit_to_avatar(callback, &exec_params)
    }

    pub fn is_target_all_blocked(&self, target: Address) -> bool {
        PolicyLookup::is_all_blocked(self, target)
    }

    pub fn is_delegate_call_blocked(&self, target: Address) -> bool {
        PolicyLookup::is_delegate_call_blocked(self, target)
    }

    pub fn is_function_blocked(&self, target: Address, function_signature: FixedBytes<4>) -> bool {
        PolicyLookup::is_function_blocked(self, target, function_signature)
    }

    /// Zero when no exceptional sender is set for the target.
    pub fn get_exceptional_sender(&self, target: Address) -> Address {
        self.exceptional_senders.get(target)
    }

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    pub fn avatar(&self) -> Address {
        self.avatar.get()
    }

    pub fn executor(&self) -> Address {
        self.executor.get()
    }

    /// Unrecognized calldata with no value attached is accepted as a no-op.
    /// Attached value reverts: the guard has no payable surface.
    #[fallback]
    pub fn fallback(&mut self, _calldata: &[u8]) -> ArbResult {
        Ok(Vec::new())
    }
}

impl BlacklistGuard {
    /// The owner as an explicit optional principal; the zero-address
    /// sentinel never leaks past this point.
    fn current_owner(&self) -> Option<Address> {
        let owner = self.owner.get();
        (owner != Address::ZERO).then_some(owner)
    }

    fn caller_is_owner(&self) -> bool {
        match self.current_owner() {
            Some(owner) => owner == self.vm().msg_sender(),
            None => false,
        }
    }

    fn require_owner(&self) -> Result<(), GuardError> {
        if self.caller_is_owner() {
            return Ok(());
        }
        Err(GuardError::Unauthorized(Unauthorized {
            reason: "Only owner can call".into(),
        }))
    }

    fn require_owner_or_avatar(&self) -> Result<(), GuardError> {
        let avatar = self.avatar.get();
        if self.caller_is_owner() || (avatar != Address::ZERO && self.vm().msg_sender() == avatar) {
            return Ok(());
        }
        Err(GuardError::Unauthorized(Unauthorized {
            reason: "Only 'avatar' and owner can call".into(),
        }))
    }

    /// Request-path predicate: the guard's owner, or the principal the
    /// avatar itself answers for in its `owner()` query.
    fn require_avatars_owner_or_owner(&self) -> Result<(), GuardError> {
        if self.caller_is_owner() {
            return Ok(());
        }
        if self.avatar_owner() == Some(self.vm().msg_sender()) {
            return Ok(());
        }
        Err(GuardError::Unauthorized(Unauthorized {
            reason: "Only avatar's Owner and owner can call".into(),
        }))
    }

    /// `owner()` staticcall against the avatar.
    fn avatar_owner(&self) -> Option<Address> {
        let avatar = self.avatar.get();
        if avatar == Address::ZERO {
            return None;
        }
        let data = IOwnable::ownerCall {}.abi_encode();
        let out = unsafe { RawCall::new_static().call(avatar, &data) }.ok()?;
        if out.len() < 32 {
            return None;
        }
        let owner = Address::from_slice(&out[12..32]);
        (owner != Address::ZERO).then_some(owner)
    }

    /// Submit a policy-change callback, addressed at the guard itself, to
    /// the avatar's `execTransaction` with the caller-supplied execution
    /// parameters.
    fn submit_to_avatar(&mut self, callback: Vec<u8>, exec_params: &[u8]) -> Result<(), GuardError> {
        let params = parse_exec_params(exec_params)
            .map_err(|_| GuardError::InvalidExecParams(InvalidExecParams {}))?;
        let submission = IAvatar::execTransactionCall {
            to: self.vm().contract_address(),
            value: U256::ZERO,
            data: callback.into(),
            operation: Operation::Call as u8,
            safeTxGas: params.safe_tx_gas,
            baseGas: params.base_gas,
            gasPrice: params.gas_price,
            gasToken: params.gas_token,
            refundReceiver: params.refund_receiver,
            signatures: params.signatures.into(),
        }
        .abi_encode();

        let out = unsafe { RawCall::new().call(self.avatar.get(), &submission) }
            .map_err(|_| GuardError::RequestNotAccepted(RequestNotAccepted {}))?;
        // `execTransaction` answers with a success word; an explicit
        // `false` is a refusal even though the call itself returned.
        if out.len() >= 32 && U256::from_be_slice(&out[..32]) == U256::ZERO {
            return Err(GuardError::RequestNotAccepted(RequestNotAccepted {}));
        }
        Ok(())
    }
}

impl PolicyLookup for BlacklistGuard {
    fn is_all_blocked(&self, target: Address) -> bool {
        self.targets.getter(target).all_blocked.get()
    }

    fn is_delegate_call_blocked(&self, target: Address) -> bool {
        self.targets.getter(target).delegate_call_blocked.get()
    }

    fn is_function_blocked(&self, target: Address, selector: FixedBytes<4>) -> bool {
        self.targets.getter(target).blocked_functions.get(selector)
    }

    fn exceptional_sender(&self, target: Address) -> Option<Address> {
        let sender = self.exceptional_senders.get(target);
        (sender != Address::ZERO).then_some(sender)
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolEvent;
    use stylus_sdk::testing::*;

    use blacklist_guard_types::ExecParams;

    use super::*;

    fn deployer() -> Address {
        Address::repeat_byte(0xd0)
    }

    fn owner_addr() -> Address {
        Address::repeat_byte(0x01)
    }

    fn avatar_addr() -> Address {
        Address::repeat_byte(0x02)
    }

    fn executor_addr() -> Address {
        Address::repeat_byte(0x03)
    }

    fn guard_addr() -> Address {
        Address::repeat_byte(0x99)
    }

    fn stranger() -> Address {
        Address::repeat_byte(0xee)
    }

    const SEL: FixedBytes<4> = FixedBytes([0x12, 0x34, 0x56, 0x78]);

    fn test_vm() -> TestVM {
        TestVMBuilder::new()
            .sender(deployer())
            .contract_address(guard_addr())
            .build()
    }

    fn setup_params(owner: Address, avatar: Address, executor: Address) -> Vec<u8> {
        (owner, avatar, executor).abi_encode_params()
    }

    fn deployed(vm: &TestVM) -> BlacklistGuard {
        let mut guard = BlacklistGuard::from(vm);
        guard
            .set_up(setup_params(owner_addr(), avatar_addr(), executor_addr()))
            .unwrap();
        guard
    }

    fn encode_exec_params(params: &ExecParams) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&params.safe_tx_gas.to_be_bytes::<32>());
        out.extend_from_slice(&params.base_gas.to_be_bytes::<32>());
        out.extend_from_slice(&params.gas_price.to_be_bytes::<32>());
        out.extend_from_slice(params.gas_token.as_slice());
        out.extend_from_slice(params.refund_receiver.as_slice());
        out.extend_from_slice(&(params.signatures.len() as u16).to_be_bytes());
        out.extend_from_slice(&params.signatures);
        out
    }

    fn sample_exec_params() -> ExecParams {
        ExecParams {
            safe_tx_gas: U256::from(100_000u64),
            base_gas: U256::from(21_000u64),
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            signatures: vec![0x5a; 65],
        }
    }

    fn assert_unauthorized(result: Result<(), GuardError>, expected_reason: &str) {
        match result {
            Err(GuardError::Unauthorized(e)) => assert_eq!(e.reason, expected_reason),
            Err(_) => panic!("wrong error kind"),
            Ok(()) => panic!("expected Unauthorized, got Ok"),
        }
    }

    #[test]
    fn set_up_stores_principals_and_emits() {
        let vm = test_vm();
        let guard = deployed(&vm);

        assert_eq!(guard.owner(), owner_addr());
        assert_eq!(guard.avatar(), avatar_addr());
        assert_eq!(guard.executor(), executor_addr());

        let logs = vm.get_emitted_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0[0], GuardSetup::SIGNATURE_HASH);
    }

    #[test]
    fn set_up_twice_fails() {
        let vm = test_vm();
        let mut guard = deployed(&vm);

        let again = guard.set_up(setup_params(owner_addr(), avatar_addr(), executor_addr()));
        assert!(matches!(again, Err(GuardError::AlreadyInitialized(_))));
    }

    #[test]
    fn set_up_stays_sealed_after_renounce() {
        let vm = test_vm();
        let mut guard = deployed(&vm);

        vm.set_sender(owner_addr());
        guard.renounce_ownership().unwrap();
        assert_eq!(guard.owner(), Address::ZERO);

        let again = guard.set_up(setup_params(stranger(), avatar_addr(), executor_addr()));
        assert!(matches!(again, Err(GuardError::AlreadyInitialized(_))));
    }

    #[test]
    fn set_up_rejects_zero_owner() {
        let vm = test_vm();
        let mut guard = BlacklistGuard::from(&vm);

        let result = guard.set_up(setup_params(Address::ZERO, avatar_addr(), executor_addr()));
        assert!(matches!(result, Err(GuardError::InvalidOwner(_))));
    }

    #[test]
    fn set_up_rejects_malformed_params() {
        let vm = test_vm();
        let mut guard = BlacklistGuard::from(&vm);

        let result = guard.set_up(vec![0xba, 0xdd, 0xad]);
        assert!(matches!(result, Err(GuardError::InvalidParameters(_))));
    }

    #[test]
    fn never_written_targets_answer_defaults() {
        let vm = test_vm();
        let guard = deployed(&vm);
        let target = stranger();

        assert!(!guard.is_target_all_blocked(target));
        assert!(!guard.is_delegate_call_blocked(target));
        assert!(!guard.is_function_blocked(target, SEL));
        assert_eq!(guard.get_exceptional_sender(target), Address::ZERO);
    }

    #[test]
    fn set_target_requires_owner_or_avatar() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();

        vm.set_sender(stranger());
        assert_unauthorized(
            guard.set_target(target, true, false, SEL, false),
            "Only 'avatar' and owner can call",
        );

        vm.set_sender(owner_addr());
        guard.set_target(target, true, false, SEL, false).unwrap();
        assert!(guard.is_target_all_blocked(target));

        vm.set_sender(avatar_addr());
        guard.set_target(target, false, false, SEL, false).unwrap();
        assert!(!guard.is_target_all_blocked(target));
    }

    #[test]
    fn set_target_round_trips_and_emits() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();

        vm.set_sender(owner_addr());
        guard.set_target(target, true, true, SEL, true).unwrap();
        assert!(guard.is_target_all_blocked(target));
        assert!(guard.is_delegate_call_blocked(target));
        assert!(guard.is_function_blocked(target, SEL));

        guard.set_target(target, false, false, SEL, false).unwrap();
        assert!(!guard.is_target_all_blocked(target));
        assert!(!guard.is_delegate_call_blocked(target));
        assert!(!guard.is_function_blocked(target, SEL));

        let set_target_logs: Vec<_> = vm
            .get_emitted_logs()
            .into_iter()
            .filter(|(topics, _)| topics[0] == SetTarget::SIGNATURE_HASH)
            .collect();
        assert_eq!(set_target_logs.len(), 2);
    }

    #[test]
    fn set_target_overwrites_flags_but_only_toggles_one_selector() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();
        let other_sel = FixedBytes([0xde, 0xad, 0xbe, 0xef]);

        vm.set_sender(owner_addr());
        guard.set_target(target, true, true, SEL, true).unwrap();
        // Second call resets both flags; SEL's membership is untouched
        // because only `other_sel` is named.
        guard
            .set_target(target, false, false, other_sel, true)
            .unwrap();

        assert!(!guard.is_target_all_blocked(target));
        assert!(!guard.is_delegate_call_blocked(target));
        assert!(guard.is_function_blocked(target, SEL));
        assert!(guard.is_function_blocked(target, other_sel));
    }

    #[test]
    fn set_exceptional_sender_is_owner_only() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();

        vm.set_sender(avatar_addr());
        assert_unauthorized(
            guard.set_exceptional_sender(target, executor_addr()),
            "Only owner can call",
        );

        vm.set_sender(owner_addr());
        guard
            .set_exceptional_sender(target, executor_addr())
            .unwrap();
        assert_eq!(guard.get_exceptional_sender(target), executor_addr());

        let logs = vm.get_emitted_logs();
        assert_eq!(
            logs.last().unwrap().0[0],
            SetExceptionalSender::SIGNATURE_HASH
        );

        // Re-pointing overwrites; there is no second slot.
        guard.set_exceptional_sender(target, stranger()).unwrap();
        assert_eq!(guard.get_exceptional_sender(target), stranger());
    }

    #[test]
    fn transfer_ownership_moves_the_owner_branch() {
        let vm = test_vm();
        let mut guard = deployed(&vm);

        vm.set_sender(stranger());
        assert_unauthorized(guard.transfer_ownership(stranger()), "Only owner can call");

        vm.set_sender(owner_addr());
        assert!(matches!(
            guard.transfer_ownership(Address::ZERO),
            Err(GuardError::InvalidOwner(_))
        ));
        guard.transfer_ownership(stranger()).unwrap();
        assert_eq!(guard.owner(), stranger());

        // The old owner is just another caller now.
        assert_unauthorized(
            guard.set_exceptional_sender(stranger(), executor_addr()),
            "Only owner can call",
        );
    }

    #[test]
    fn renounce_kills_owner_gates_but_not_avatar_gates() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();

        vm.set_sender(owner_addr());
        guard.renounce_ownership().unwrap();
        assert_eq!(guard.owner(), Address::ZERO);

        assert_unauthorized(
            guard.set_exceptional_sender(target, executor_addr()),
            "Only owner can call",
        );
        assert_unauthorized(
            guard.set_target(target, true, false, SEL, false),
            "Only 'avatar' and owner can call",
        );

        vm.set_sender(avatar_addr());
        guard.set_target(target, true, false, SEL, false).unwrap();
        assert!(guard.is_target_all_blocked(target));
    }

    fn check(
        guard: &BlacklistGuard,
        to: Address,
        data: &[u8],
        operation: u8,
        sender: Address,
    ) -> Result<(), GuardError> {
        guard.check_transaction(
            to,
            U256::ZERO,
            data.to_vec(),
            operation,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            Address::ZERO,
            Address::ZERO,
            Vec::new(),
            sender,
        )
    }

    #[test]
    fn check_transaction_enforces_stored_policy() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();

        vm.set_sender(owner_addr());
        guard.set_target(target, true, false, SEL, false).unwrap();
        assert!(matches!(
            check(&guard, target, &[], 0, owner_addr()),
            Err(GuardError::TargetAddressBlocked(_))
        ));

        guard.set_target(target, false, true, SEL, false).unwrap();
        assert!(matches!(
            check(&guard, target, &[], 1, owner_addr()),
            Err(GuardError::DelegateCallNotAllowed(_))
        ));
        assert!(check(&guard, target, &[], 0, owner_addr()).is_ok());

        assert!(matches!(
            check(&guard, target, &[0x12, 0x34, 0x56], 0, owner_addr()),
            Err(GuardError::FunctionSignatureTooShort(_))
        ));

        guard.set_target(target, false, false, SEL, true).unwrap();
        assert!(matches!(
            check(&guard, target, SEL.as_slice(), 0, owner_addr()),
            Err(GuardError::FunctionCallBlocked(_))
        ));
        // Empty-data value transfers are untouched by selector blocks.
        assert!(check(&guard, target, &[], 0, owner_addr()).is_ok());
    }

    #[test]
    fn check_transaction_rejects_unknown_operation() {
        let vm = test_vm();
        let guard = deployed(&vm);

        assert!(matches!(
            check(&guard, stranger(), &[], 2, owner_addr()),
            Err(GuardError::InvalidOperation(_))
        ));
    }

    #[test]
    fn check_after_execution_is_a_noop() {
        let vm = test_vm();
        let guard = deployed(&vm);
        guard.check_after_execution(FixedBytes::ZERO, true);
        guard.check_after_execution(FixedBytes::ZERO, false);
    }

    #[test]
    fn executor_bypasses_guards_own_blocked_mutator() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let set_target_sel = FixedBytes(IBlacklistGuard::setTargetCall::SELECTOR);

        // The guard blocks its own setTarget selector against the avatar.
        vm.set_sender(owner_addr());
        guard
            .set_target(guard_addr(), false, false, set_target_sel, true)
            .unwrap();
        guard
            .set_exceptional_sender(guard_addr(), executor_addr())
            .unwrap();

        let unblock = IBlacklistGuard::setTargetCall {
            target: guard_addr(),
            blockAll: false,
            blockDelegateCall: false,
            functionSignature: set_target_sel,
            blockFunction: false,
        }
        .abi_encode();

        // Avatar-originated attempt to unblock is rejected...
        assert!(matches!(
            check(&guard, guard_addr(), &unblock, 0, avatar_addr()),
            Err(GuardError::FunctionCallBlocked(_))
        ));
        // ...the same change delivered by the registered executor passes.
        assert!(check(&guard, guard_addr(), &unblock, 0, executor_addr()).is_ok());

        // Delivery itself is the avatar calling its own mutator: the
        // selector unblocks and SetTarget fires with the new state.
        vm.set_sender(avatar_addr());
        guard
            .set_target(guard_addr(), false, false, set_target_sel, false)
            .unwrap();
        assert!(!guard.is_function_blocked(guard_addr(), set_target_sel));
        let logs = vm.get_emitted_logs();
        assert_eq!(logs.last().unwrap().0[0], SetTarget::SIGNATURE_HASH);
    }

    fn mock_avatar_owner(vm: &TestVM, upstream: Address) {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(upstream.as_slice());
        vm.mock_call(
            avatar_addr(),
            IOwnable::ownerCall {}.abi_encode(),
            Ok(word.to_vec()),
        );
    }

    fn expected_submission(callback: Vec<u8>, params: &ExecParams) -> Vec<u8> {
        IAvatar::execTransactionCall {
            to: guard_addr(),
            value: U256::ZERO,
            data: callback.into(),
            operation: Operation::Call as u8,
            safeTxGas: params.safe_tx_gas,
            baseGas: params.base_gas,
            gasPrice: params.gas_price,
            gasToken: params.gas_token,
            refundReceiver: params.refund_receiver,
            signatures: params.signatures.clone().into(),
        }
        .abi_encode()
    }

    fn success_word() -> Vec<u8> {
        U256::from(1u8).to_be_bytes::<32>().to_vec()
    }

    #[test]
    fn request_set_target_requires_owner_or_avatars_owner() {
        let vm = test_vm();
        let mut guard = deployed(&vm);

        mock_avatar_owner(&vm, Address::repeat_byte(0x42));
        vm.set_sender(stranger());
        assert_unauthorized(
            guard.request_set_target(
                stranger(),
                true,
                false,
                SEL,
                false,
                encode_exec_params(&sample_exec_params()),
            ),
            "Only avatar's Owner and owner can call",
        );
    }

    #[test]
    fn request_set_target_submits_but_mutates_nothing() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let target = stranger();
        let params = sample_exec_params();

        let callback = IBlacklistGuard::setTargetCall {
            target,
            blockAll: true,
            blockDelegateCall: false,
            functionSignature: SEL,
            blockFunction: true,
        }
        .abi_encode();
        vm.mock_call(
            avatar_addr(),
            expected_submission(callback, &params),
            Ok(success_word()),
        );

        vm.set_sender(owner_addr());
        guard
            .request_set_target(target, true, false, SEL, true, encode_exec_params(&params))
            .unwrap();

        // Enqueued outcome: nothing changed and no SetTarget fired. The
        // change only lands when the avatar (or its executor) delivers the
        // callback in its own transaction.
        assert!(!guard.is_target_all_blocked(target));
        assert!(!guard.is_function_blocked(target, SEL));
        assert!(vm
            .get_emitted_logs()
            .iter()
            .all(|(topics, _)| topics[0] != SetTarget::SIGNATURE_HASH));
    }

    #[test]
    fn request_set_target_accepts_the_avatars_upstream_owner() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let upstream = Address::repeat_byte(0x42);
        let params = sample_exec_params();

        mock_avatar_owner(&vm, upstream);
        let callback = IBlacklistGuard::setTargetCall {
            target: stranger(),
            blockAll: false,
            blockDelegateCall: true,
            functionSignature: SEL,
            blockFunction: false,
        }
        .abi_encode();
        vm.mock_call(
            avatar_addr(),
            expected_submission(callback, &params),
            Ok(success_word()),
        );

        vm.set_sender(upstream);
        guard
            .request_set_target(
                stranger(),
                false,
                true,
                SEL,
                false,
                encode_exec_params(&params),
            )
            .unwrap();
    }

    #[test]
    fn request_set_exceptional_sender_submits_matching_callback() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let params = sample_exec_params();

        let callback = IBlacklistGuard::setExceptionalSenderCall {
            target: guard_addr(),
            sender: executor_addr(),
        }
        .abi_encode();
        vm.mock_call(
            avatar_addr(),
            expected_submission(callback, &params),
            Ok(success_word()),
        );

        vm.set_sender(owner_addr());
        guard
            .request_set_exceptional_sender(
                guard_addr(),
                executor_addr(),
                encode_exec_params(&params),
            )
            .unwrap();
        // Still pending delivery; the override is not in place yet.
        assert_eq!(guard.get_exceptional_sender(guard_addr()), Address::ZERO);
    }

    #[test]
    fn request_surfaces_avatar_refusal() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        let params = sample_exec_params();

        let callback = IBlacklistGuard::setTargetCall {
            target: stranger(),
            blockAll: true,
            blockDelegateCall: false,
            functionSignature: SEL,
            blockFunction: false,
        }
        .abi_encode();
        vm.mock_call(
            avatar_addr(),
            expected_submission(callback, &params),
            Ok(U256::ZERO.to_be_bytes::<32>().to_vec()),
        );

        vm.set_sender(owner_addr());
        let result = guard.request_set_target(
            stranger(),
            true,
            false,
            SEL,
            false,
            encode_exec_params(&params),
        );
        assert!(matches!(result, Err(GuardError::RequestNotAccepted(_))));
    }

    #[test]
    fn request_rejects_malformed_exec_params() {
        let vm = test_vm();
        let mut guard = deployed(&vm);

        vm.set_sender(owner_addr());
        let result = guard.request_set_target(stranger(), true, false, SEL, false, vec![0x00; 7]);
        assert!(matches!(result, Err(GuardError::InvalidExecParams(_))));
    }

    #[test]
    fn fallback_is_a_value_free_noop() {
        let vm = test_vm();
        let mut guard = deployed(&vm);
        assert_eq!(guard.fallback(&[0xba, 0xdd, 0xad]), Ok(Vec::new()));
    }
}
