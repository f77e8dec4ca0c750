//! Solidity ABI interface scaffolding for the avatar-side collaborators.
//!
//! Note: the guard implements none of these. Having them around makes ABI
//! expectations explicit and enables cross-contract calls where needed.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    /// Safe-style avatar execution surface. The request relay submits
    /// policy-change callbacks through `execTransaction`.
    interface IAvatar {
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes calldata signatures
        ) external payable returns (bool success);

        function setGuard(address guard) external;
        function enableModule(address module) external;
        function disableModule(address prevModule, address module) external;
    }

    /// Upstream-owner query used by the request authorization path.
    interface IOwnable {
        function owner() external view returns (address);
    }

    /// Delayed-execution relay expected to deliver the second half of a
    /// request when the avatar does not execute synchronously.
    interface IDelayModifier {
        function execTransactionFromModule(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation
        ) external returns (bool success);

        function executeNextTx(address to, uint256 value, bytes calldata data, uint8 operation) external;
        function enableModule(address module) external;
    }

    /// The guard's own mutator ABI; the relay builds callback payloads
    /// against it.
    interface IBlacklistGuard {
        function setTarget(
            address target,
            bool blockAll,
            bool blockDelegateCall,
            bytes4 functionSignature,
            bool blockFunction
        ) external;

        function setExceptionalSender(address target, address sender) external;
    }
}
