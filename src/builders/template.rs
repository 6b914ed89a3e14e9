use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::info;

use super::approve_action;
use crate::config::ExampleConfig;
use crate::message::CrossChainMessage;
use crate::traits::MessageBuilder;
use crate::{spans, Result};

/// The smallest useful bundle: approve the configured contract to spend the
/// bridged output token.
///
/// Copy this builder as the starting point for a new integration and append
/// the calls that use the allowance.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    config: ExampleConfig,
}

impl TemplateBuilder {
    pub fn new(config: ExampleConfig) -> Self {
        Self { config }
    }
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new(ExampleConfig::template())
    }
}

#[async_trait]
impl MessageBuilder for TemplateBuilder {
    fn name(&self) -> &'static str {
        "template"
    }

    fn config(&self) -> &ExampleConfig {
        &self.config
    }

    async fn create_message(&self, recipient: Address) -> Result<CrossChainMessage> {
        let span = spans::create_message(self.name(), &recipient);
        let _guard = span.enter();

        let config = &self.config;
        let message = CrossChainMessage::new(
            config.fallback_recipient_for(recipient),
            vec![approve_action(
                config.output_token,
                config.contract_address,
                config.amount,
            )],
        );

        info!(
            action_count = message.actions.len(),
            spender = %config.contract_address,
            event = "message_created"
        );

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calldata::decode_with_signature;
    use crate::config::BASE_USDC;
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::U256;

    #[tokio::test]
    async fn test_template_approves_contract() {
        let builder = TemplateBuilder::default();
        let recipient = Address::repeat_byte(0x11);

        let message = builder.create_message(recipient).await.unwrap();

        assert_eq!(message.fallback_recipient, recipient);
        assert_eq!(message.actions.len(), 1);
        assert_eq!(message.actions[0].target, BASE_USDC);
        assert_eq!(message.actions[0].value, U256::ZERO);

        let args = decode_with_signature(
            "function approve(address spender, uint256 value)",
            &message.actions[0].call_data,
        )
        .unwrap();
        assert_eq!(
            args,
            vec![
                DynSolValue::Address(builder.config().contract_address),
                DynSolValue::Uint(U256::from(10_000_000u64), 256),
            ]
        );
    }
}
