use std::sync::Arc;

use alloy_primitives::{address, Address};
use async_trait::async_trait;
use tracing::{info, Instrument};

use super::approve_action;
use crate::chain::{eligible_chain, EligibleChain};
use crate::config::ExampleConfig;
use crate::message::{Action, CrossChainMessage, Recompute};
use crate::quote::{require_quote, QuoteKind, QuoteProvider, QuoteRequest};
use crate::traits::MessageBuilder;
use crate::{spans, Result};

/// KyberSwap's name for the SwapMode V3 DEX
pub const SWAPMODE_DEX: &str = "DEX_SWAPMODEV3";

/// SwapMode WETH pool on Base
pub const SWAPMODE_POOL: Address = address!("74cb6260Be6F31965C239Df6d6Ef2Ac2B5D4f020");

pub const SWAPMODE_TICK_LOWER: i32 = -194_904;
pub const SWAPMODE_TICK_UPPER: i32 = -193_903;

/// Zaps the bridged token into a SwapMode concentrated-liquidity position
/// through the KyberSwap zap router.
pub struct SwapModeBuilder {
    config: ExampleConfig,
    quotes: Arc<dyn QuoteProvider>,
    pool: Address,
    tick_lower: i32,
    tick_upper: i32,
}

impl SwapModeBuilder {
    pub fn new(config: ExampleConfig, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self {
            config,
            quotes,
            pool: SWAPMODE_POOL,
            tick_lower: SWAPMODE_TICK_LOWER,
            tick_upper: SWAPMODE_TICK_UPPER,
        }
    }

    /// Targets a different pool and tick range
    pub fn with_position(mut self, pool: Address, tick_lower: i32, tick_upper: i32) -> Self {
        self.pool = pool;
        self.tick_lower = tick_lower;
        self.tick_upper = tick_upper;
        self
    }

    async fn build(&self, recipient: Address) -> Result<CrossChainMessage> {
        let config = &self.config;
        let handler = eligible_chain(config.destination_chain)?.multicall_handler_address()?;

        let request = QuoteRequest {
            chain_id: config.destination_chain,
            input_token: config.output_token,
            amount: config.amount,
            sender: handler,
            recipient,
            kind: QuoteKind::ZapIn {
                dex: SWAPMODE_DEX.to_string(),
                pool: self.pool,
                tick_lower: self.tick_lower,
                tick_upper: self.tick_upper,
            },
        };
        let zap = require_quote(self.quotes.as_ref(), &request).await?;

        let actions = vec![
            approve_action(config.output_token, zap.to, config.amount),
            Action::new(zap.to, zap.data)
                .with_value(zap.value)
                .with_update(Recompute::Quote(request)),
        ];

        info!(
            action_count = actions.len(),
            router = %zap.to,
            pool = %self.pool,
            event = "message_created"
        );

        Ok(CrossChainMessage::new(
            config.fallback_recipient_for(recipient),
            actions,
        ))
    }
}

#[async_trait]
impl MessageBuilder for SwapModeBuilder {
    fn name(&self) -> &'static str {
        "swapmode"
    }

    fn config(&self) -> &ExampleConfig {
        &self.config
    }

    async fn create_message(&self, recipient: Address) -> Result<CrossChainMessage> {
        let span = spans::create_message(self.name(), &recipient);
        self.build(recipient).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::QuoteTx;
    use crate::testing::FakeQuoteProvider;
    use crate::ActionsError;
    use alloy_primitives::{Bytes, U256};

    #[tokio::test]
    async fn test_zap_request_targets_position() {
        let quotes = FakeQuoteProvider::new();
        quotes.push_quote(QuoteTx {
            to: Address::repeat_byte(0x2a),
            data: Bytes::from_static(&[0xaa, 0xbb]),
            value: U256::ZERO,
        });
        let builder = SwapModeBuilder::new(ExampleConfig::swapmode(), Arc::new(quotes.clone()));

        let message = builder.create_message(Address::repeat_byte(0x66)).await.unwrap();

        assert_eq!(message.actions.len(), 2);
        assert_eq!(message.actions[1].target, Address::repeat_byte(0x2a));

        let requests = quotes.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].kind,
            QuoteKind::ZapIn {
                dex: "DEX_SWAPMODEV3".to_string(),
                pool: SWAPMODE_POOL,
                tick_lower: -194_904,
                tick_upper: -193_903,
            }
        );
    }

    #[tokio::test]
    async fn test_failing_quote_service_propagates() {
        let quotes = FakeQuoteProvider::new();
        quotes.fail_with("zap api unreachable");
        let builder = SwapModeBuilder::new(ExampleConfig::swapmode(), Arc::new(quotes));

        let result = builder.create_message(Address::repeat_byte(0x66)).await;
        assert!(matches!(result, Err(ActionsError::QuoteUnavailable { .. })));
    }
}
