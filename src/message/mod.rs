//! Cross-chain action bundles
//!
//! A [`CrossChainMessage`] is the ordered list of calls the Across multicall
//! handler makes on the destination chain after a fill. It is built once,
//! before the bridged amount is known; [`CrossChainMessage::resolve`] then
//! produces the [`ResolvedMessage`] that is actually encoded into the deposit.

mod action;

pub use action::{Action, ActionOverride, Recompute, ResolvedAction, UpdateKind};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use tracing::{debug, error, info, Instrument};

use crate::contracts::multicall_handler::IMulticallHandler::{Call, Instructions};
use crate::quote::QuoteProvider;
use crate::{spans, ActionsError, Result};

/// Destination calls plus the account that receives the funds if they fail.
///
/// Actions run in order and are only addressed by position.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossChainMessage {
    pub fallback_recipient: Address,
    pub actions: Vec<Action>,
}

impl CrossChainMessage {
    pub fn new(fallback_recipient: Address, actions: Vec<Action>) -> Self {
        Self {
            fallback_recipient,
            actions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The message as built, before any update is applied.
    ///
    /// Used to size the deposit's message when requesting a fee quote.
    pub fn placeholder(&self) -> ResolvedMessage {
        ResolvedMessage {
            fallback_recipient: self.fallback_recipient,
            actions: self
                .actions
                .iter()
                .map(|action| ResolvedAction {
                    target: action.target,
                    call_data: action.call_data.clone(),
                    value: action.value,
                })
                .collect(),
        }
    }

    /// Applies every action's update for `output_amount`, in order.
    ///
    /// The first failing update aborts resolution with
    /// [`ActionsError::UpdateFailed`] carrying its position.
    pub async fn resolve<Q>(&self, output_amount: U256, quotes: &Q) -> Result<ResolvedMessage>
    where
        Q: QuoteProvider + ?Sized,
    {
        let span = spans::resolve_message(self.actions.len(), &output_amount);
        self.resolve_actions(output_amount, quotes)
            .instrument(span)
            .await
    }

    async fn resolve_actions<Q>(&self, output_amount: U256, quotes: &Q) -> Result<ResolvedMessage>
    where
        Q: QuoteProvider + ?Sized,
    {
        let mut actions = Vec::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            let resolved = action
                .resolve(output_amount, quotes)
                .await
                .map_err(|e| {
                    spans::record_error_with_context(
                        "UpdateFailed",
                        &e.to_string(),
                        Some(&format!("action {index} targeting {}", action.target)),
                    );
                    error!(
                        index = index,
                        target = %action.target,
                        error = %e,
                        event = "action_update_failed"
                    );
                    ActionsError::UpdateFailed {
                        index,
                        reason: e.to_string(),
                    }
                })?;

            debug!(
                index = index,
                target = %resolved.target,
                value = %resolved.value,
                updated = !matches!(action.update, UpdateKind::None),
                event = "action_resolved"
            );
            actions.push(resolved);
        }

        info!(
            action_count = actions.len(),
            output_amount = %output_amount,
            fallback_recipient = %self.fallback_recipient,
            event = "message_resolved"
        );

        Ok(ResolvedMessage {
            fallback_recipient: self.fallback_recipient,
            actions,
        })
    }
}

/// A message whose calls are final
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub fallback_recipient: Address,
    pub actions: Vec<ResolvedAction>,
}

impl ResolvedMessage {
    /// `abi.encode(Instructions)` as the multicall handler expects it
    pub fn encode_instructions(&self) -> Bytes {
        let instructions = Instructions {
            calls: self
                .actions
                .iter()
                .map(|action| Call {
                    target: action.target,
                    callData: action.call_data.clone(),
                    value: action.value,
                })
                .collect(),
            fallbackRecipient: self.fallback_recipient,
        };

        instructions.abi_encode().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calldata::approve_calldata;
    use crate::quote::NoQuotes;
    use alloy_primitives::address;

    fn approve_action(spender: Address) -> Action {
        Action::new(Address::repeat_byte(0xaa), approve_calldata(spender, U256::from(1u64)))
            .with_update(Recompute::Approve { spender })
    }

    #[tokio::test]
    async fn test_resolve_preserves_order_and_original() {
        let message = CrossChainMessage::new(
            Address::repeat_byte(0xff),
            vec![
                approve_action(Address::repeat_byte(1)),
                Action::new(Address::repeat_byte(2), Bytes::from_static(&[0xde, 0xad])),
                approve_action(Address::repeat_byte(3)),
            ],
        );
        let snapshot = message.clone();

        let resolved = message.resolve(U256::from(99u64), &NoQuotes).await.unwrap();

        assert_eq!(message, snapshot);
        assert_eq!(resolved.actions.len(), 3);
        assert_eq!(resolved.actions[1].target, Address::repeat_byte(2));
        assert_eq!(resolved.actions[2].call_data, approve_calldata(Address::repeat_byte(3), U256::from(99u64)));
        assert_eq!(resolved.fallback_recipient, Address::repeat_byte(0xff));
    }

    #[tokio::test]
    async fn test_failed_update_reports_position() {
        let request = crate::quote::QuoteRequest {
            chain_id: 8453,
            input_token: Address::ZERO,
            amount: U256::ZERO,
            sender: Address::ZERO,
            recipient: Address::ZERO,
            kind: crate::quote::QuoteKind::IndexMint {
                index_token: Address::ZERO,
                input_decimals: 6,
                slippage_percent: 0.1,
            },
        };
        let message = CrossChainMessage::new(
            Address::ZERO,
            vec![
                approve_action(Address::repeat_byte(1)),
                Action::new(Address::repeat_byte(2), Bytes::new()).with_update(Recompute::Quote(request)),
            ],
        );

        let result = message.resolve(U256::from(1u64), &NoQuotes).await;
        assert!(matches!(result, Err(ActionsError::UpdateFailed { index: 1, .. })));
    }

    #[test]
    fn test_encode_instructions_layout() {
        let message = ResolvedMessage {
            fallback_recipient: address!("1111111111111111111111111111111111111111"),
            actions: vec![ResolvedAction {
                target: address!("2222222222222222222222222222222222222222"),
                call_data: Bytes::from_static(&[0xab, 0xcd]),
                value: U256::from(3u64),
            }],
        };

        let encoded = message.encode_instructions();
        let decoded = Instructions::abi_decode(&encoded).unwrap();

        assert_eq!(decoded.fallbackRecipient, message.fallback_recipient);
        assert_eq!(decoded.calls.len(), 1);
        assert_eq!(decoded.calls[0].target, message.actions[0].target);
        assert_eq!(decoded.calls[0].value, U256::from(3u64));
        // Dynamic tuples are encoded behind a 32-byte offset.
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32u64));
    }

    #[test]
    fn test_empty_message() {
        let message = CrossChainMessage::new(Address::ZERO, vec![]);
        assert!(message.is_empty());
    }
}
