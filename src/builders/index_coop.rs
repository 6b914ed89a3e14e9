use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::{info, Instrument};

use super::approve_action;
use crate::chain::{eligible_chain, EligibleChain};
use crate::config::ExampleConfig;
use crate::message::{Action, CrossChainMessage, Recompute};
use crate::quote::{require_quote, QuoteKind, QuoteProvider, QuoteRequest};
use crate::traits::MessageBuilder;
use crate::{spans, Result};

/// Slippage tolerance for flash-mint quotes, in percent
pub const INDEX_SLIPPAGE_PERCENT: f64 = 0.1;

pub const USDC_DECIMALS: u8 = 6;

/// Flash-mints an Index Coop token with the bridged output token.
///
/// The flash-mint transaction comes from a quote, so the bundle is quoted
/// once at build time for the configured amount and again for the bridged
/// amount. The second quote may name a different flash-mint contract.
pub struct IndexCoopBuilder {
    config: ExampleConfig,
    quotes: Arc<dyn QuoteProvider>,
    input_decimals: u8,
    slippage_percent: f64,
}

impl IndexCoopBuilder {
    /// `config.contract_address` is the index token to mint
    pub fn new(config: ExampleConfig, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self {
            config,
            quotes,
            input_decimals: USDC_DECIMALS,
            slippage_percent: INDEX_SLIPPAGE_PERCENT,
        }
    }

    /// Decimals of the output token being spent on the mint
    pub fn with_input_decimals(mut self, decimals: u8) -> Self {
        self.input_decimals = decimals;
        self
    }

    pub fn with_slippage_percent(mut self, slippage_percent: f64) -> Self {
        self.slippage_percent = slippage_percent;
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
            kind: QuoteKind::IndexMint {
                index_token: config.contract_address,
                input_decimals: self.input_decimals,
                slippage_percent: self.slippage_percent,
            },
        };
        let quote = require_quote(self.quotes.as_ref(), &request).await?;

        let actions = vec![
            approve_action(config.output_token, quote.to, config.amount),
            Action::new(quote.to, quote.data)
                .with_value(quote.value)
                .with_update(Recompute::Quote(request)),
        ];

        info!(
            action_count = actions.len(),
            flash_mint_contract = %quote.to,
            index_token = %config.contract_address,
            event = "message_created"
        );

        Ok(CrossChainMessage::new(
            config.fallback_recipient_for(recipient),
            actions,
        ))
    }
}

#[async_trait]
impl MessageBuilder for IndexCoopBuilder {
    fn name(&self) -> &'static str {
        "index-coop"
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
    use crate::calldata::approve_calldata;
    use crate::quote::QuoteTx;
    use crate::testing::FakeQuoteProvider;
    use crate::ActionsError;
    use alloy_primitives::{Bytes, U256};

    fn flash_mint_tx(to: u8, data: &'static [u8]) -> QuoteTx {
        QuoteTx {
            to: Address::repeat_byte(to),
            data: Bytes::from_static(data),
            value: U256::ZERO,
        }
    }

    #[tokio::test]
    async fn test_bundle_approves_quoted_contract() {
        let quotes = FakeQuoteProvider::new();
        quotes.push_quote(flash_mint_tx(0xf1, &[0x01]));
        let builder = IndexCoopBuilder::new(ExampleConfig::index_coop(), Arc::new(quotes.clone()));

        let message = builder.create_message(Address::repeat_byte(0x55)).await.unwrap();

        assert_eq!(message.actions.len(), 2);
        assert_eq!(
            message.actions[0].call_data,
            approve_calldata(Address::repeat_byte(0xf1), U256::from(10_000_000u64))
        );
        assert_eq!(message.actions[1].target, Address::repeat_byte(0xf1));
        assert_eq!(quotes.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_requote_may_change_target() {
        let quotes = FakeQuoteProvider::new();
        quotes.push_quote(flash_mint_tx(0xf1, &[0x01]));
        quotes.push_quote(flash_mint_tx(0xf2, &[0x02]));
        let builder = IndexCoopBuilder::new(ExampleConfig::index_coop(), Arc::new(quotes.clone()));

        let message = builder.create_message(Address::repeat_byte(0x55)).await.unwrap();
        let resolved = message
            .resolve(U256::from(9_990_000u64), &quotes)
            .await
            .unwrap();

        assert_eq!(resolved.actions[1].target, Address::repeat_byte(0xf2));
        assert_eq!(resolved.actions[1].call_data, Bytes::from_static(&[0x02]));
        assert_eq!(quotes.requests()[1].amount, U256::from(9_990_000u64));
    }

    #[tokio::test]
    async fn test_missing_quote_is_an_error() {
        let builder = IndexCoopBuilder::new(
            ExampleConfig::index_coop(),
            Arc::new(FakeQuoteProvider::new()),
        );

        let result = builder.create_message(Address::repeat_byte(0x55)).await;
        assert!(matches!(result, Err(ActionsError::QuoteUnavailable { .. })));
    }
}
