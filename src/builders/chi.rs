use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::info;

use super::approve_action;
use crate::calldata::mint_with_weth_calldata;
use crate::config::ExampleConfig;
use crate::message::{Action, CrossChainMessage, Recompute};
use crate::traits::MessageBuilder;
use crate::{spans, Result};

/// Mints Chi stablecoins from bridged WETH: approve the minter, then
/// `mintWithWETH(amount, recipient)`.
#[derive(Debug, Clone)]
pub struct ChiProtocolBuilder {
    config: ExampleConfig,
}

impl ChiProtocolBuilder {
    /// `config.contract_address` is the Chi minter
    pub fn new(config: ExampleConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MessageBuilder for ChiProtocolBuilder {
    fn name(&self) -> &'static str {
        "chi-protocol"
    }

    fn config(&self) -> &ExampleConfig {
        &self.config
    }

    async fn create_message(&self, recipient: Address) -> Result<CrossChainMessage> {
        let span = spans::create_message(self.name(), &recipient);
        let _guard = span.enter();

        let config = &self.config;
        let minter = config.contract_address;
        let actions = vec![
            approve_action(config.output_token, minter, config.amount),
            Action::new(minter, mint_with_weth_calldata(config.amount, recipient))
                .with_update(Recompute::ChiMint {
                    receiver: recipient,
                }),
        ];

        info!(
            action_count = actions.len(),
            minter = %minter,
            receiver = %recipient,
            event = "message_created"
        );

        Ok(CrossChainMessage::new(
            config.fallback_recipient_for(recipient),
            actions,
        ))
    }
}
