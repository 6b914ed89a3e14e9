//! Across `MulticallHandler` payload types
//!
//! The handler receives the bridged tokens on the destination chain, executes
//! `Instructions.calls` in order and, if any call reverts, emits `CallsFailed`
//! and forwards the tokens to `fallbackRecipient`.

use alloy_sol_types::sol;

sol!(
    #[allow(missing_docs)]
    #[sol(all_derives)]
    interface IMulticallHandler {
        struct Call {
            address target;
            bytes callData;
            uint256 value;
        }

        struct Instructions {
            Call[] calls;
            address fallbackRecipient;
        }

        event CallsFailed(Call[] calls, address indexed fallbackRecipient);
    }
);
