use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::info;

use super::approve_action;
use crate::calldata::supply_calldata;
use crate::config::ExampleConfig;
use crate::message::{Action, CrossChainMessage, Recompute};
use crate::traits::MessageBuilder;
use crate::{spans, Result};

/// Referral code passed to `supply`; zero means no referral
pub const AAVE_REFERRAL_CODE: u16 = 0;

/// Supplies the bridged token to an Aave V3 pool on behalf of the recipient.
#[derive(Debug, Clone)]
pub struct AaveBuilder {
    config: ExampleConfig,
}

impl AaveBuilder {
    /// `config.contract_address` is the Aave pool
    pub fn new(config: ExampleConfig) -> Self {
        Self { config }
    }
}

impl Default for AaveBuilder {
    fn default() -> Self {
        Self::new(ExampleConfig::aave())
    }
}

#[async_trait]
impl MessageBuilder for AaveBuilder {
    fn name(&self) -> &'static str {
        "aave"
    }

    fn config(&self) -> &ExampleConfig {
        &self.config
    }

    async fn create_message(&self, recipient: Address) -> Result<CrossChainMessage> {
        let span = spans::create_message(self.name(), &recipient);
        let _guard = span.enter();

        let config = &self.config;
        let pool = config.contract_address;
        let actions = vec![
            approve_action(config.output_token, pool, config.amount),
            Action::new(
                pool,
                supply_calldata(config.output_token, config.amount, recipient, AAVE_REFERRAL_CODE),
            )
            .with_update(Recompute::AaveSupply {
                asset: config.output_token,
                on_behalf: recipient,
                referral_code: AAVE_REFERRAL_CODE,
            }),
        ];

        info!(
            action_count = actions.len(),
            pool = %pool,
            on_behalf = %recipient,
            event = "message_created"
        );

        Ok(CrossChainMessage::new(
            config.fallback_recipient_for(recipient),
            actions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calldata::decode_with_signature;
    use crate::config::{BASE_AAVE_POOL, BASE_USDC};
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::U256;

    #[tokio::test]
    async fn test_supply_on_behalf_of_recipient() {
        let recipient = Address::repeat_byte(0x33);
        let message = AaveBuilder::default()
            .create_message(recipient)
            .await
            .unwrap();

        assert_eq!(message.actions.len(), 2);
        assert_eq!(message.actions[1].target, BASE_AAVE_POOL);

        let args = decode_with_signature(
            "function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode)",
            &message.actions[1].call_data,
        )
        .unwrap();
        assert_eq!(args[0], DynSolValue::Address(BASE_USDC));
        assert_eq!(args[1], DynSolValue::Uint(U256::from(10_000_000u64), 256));
        assert_eq!(args[2], DynSolValue::Address(recipient));
        assert_eq!(args[3], DynSolValue::Uint(U256::ZERO, 16));
    }
}
