// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Collateralized borrowing on Morpho Blue
//!
//! The multicall handler supplies the bridged USDC as collateral for the
//! recipient, then borrows WETH on their behalf. Borrowing for someone else
//! needs their authorization, so the recipient signs two EIP-712
//! authorizations up front: one granting the handler access and one revoking
//! it, with consecutive nonces.

use std::sync::Arc;

use alloy_network::Ethereum;
use alloy_primitives::{address, Address, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{info, Instrument};

use super::approve_action;
use crate::calldata::{
    borrow_calldata, sign_authorization, supply_collateral_calldata, Authorization, MarketParams,
};
use crate::chain::{eligible_chain, rpc_url, EligibleChain};
use crate::config::ExampleConfig;
use crate::contracts::morpho::MorphoNonceReader;
use crate::de::unix_timestamp;
use crate::message::{Action, CrossChainMessage, Recompute};
use crate::traits::{MessageBuilder, NonceSource};
use crate::{spans, ActionsError, Result};

/// WETH/USDC market on Base: borrow WETH against USDC at 86% LLTV
pub const MARKET_PARAMS: MarketParams = MarketParams {
    loan_token: address!("4200000000000000000000000000000000000006"),
    collateral_token: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
    oracle: address!("D09048c8B568Dbf5f189302beA26c9edABFC4858"),
    irm: address!("46415998764C29aB2a25CbeA6254146D50D22687"),
    lltv: U256::from_limbs([860_000_000_000_000_000, 0, 0, 0]),
};

/// 0.001 WETH
pub const BORROW_AMOUNT: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// How long the signed authorizations stay valid
pub const AUTHORIZATION_TTL_SECS: u64 = 3_600;

/// Builds the supply-and-borrow bundle for Morpho Blue.
///
/// The signer must control the recipient: Morpho only accepts an
/// authorization signed by the account it authorizes against.
pub struct MorphoBuilder {
    config: ExampleConfig,
    signer: PrivateKeySigner,
    nonces: Arc<dyn NonceSource>,
    market: MarketParams,
    borrow_amount: U256,
}

impl MorphoBuilder {
    pub fn new(
        config: ExampleConfig,
        signer: PrivateKeySigner,
        nonces: Arc<dyn NonceSource>,
    ) -> Self {
        Self {
            config,
            signer,
            nonces,
            market: MARKET_PARAMS,
            borrow_amount: BORROW_AMOUNT,
        }
    }

    /// Reads nonces from the destination chain's RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ActionsError::MissingRpcUrl`] if the destination endpoint
    /// override is set but empty.
    pub fn connect(config: ExampleConfig, signer: PrivateKeySigner) -> Result<Self> {
        let provider = ProviderBuilder::new().connect_http(rpc_url(config.destination_chain)?);
        Ok(Self::new(
            config,
            signer,
            Arc::new(MorphoNonceReader::new(provider)),
        ))
    }

    /// Like [`MorphoBuilder::connect`], with an existing destination provider
    pub fn with_provider<P>(config: ExampleConfig, signer: PrivateKeySigner, provider: P) -> Self
    where
        P: Provider<Ethereum> + Clone + Send + Sync + 'static,
    {
        Self::new(config, signer, Arc::new(MorphoNonceReader::new(provider)))
    }

    pub fn with_market(mut self, market: MarketParams) -> Self {
        self.market = market;
        self
    }

    pub fn with_borrow_amount(mut self, amount: U256) -> Self {
        self.borrow_amount = amount;
        self
    }

    async fn build(&self, recipient: Address) -> Result<CrossChainMessage> {
        if self.signer.address() != recipient {
            return Err(ActionsError::InvalidConfig(format!(
                "Morpho authorizations for {recipient} must be signed by {recipient}, not {}",
                self.signer.address()
            )));
        }

        let config = &self.config;
        let destination = eligible_chain(config.destination_chain)?;
        let verifying_contract = destination.morpho_address()?;
        let handler = destination.multicall_handler_address()?;
        let morpho = config.contract_address;

        let nonce = self.nonces.nonce(morpho, recipient).await?;
        let deadline = U256::from(unix_timestamp() + AUTHORIZATION_TTL_SECS);

        let authorize = Authorization {
            authorizer: recipient,
            authorized: handler,
            is_authorized: true,
            nonce,
            deadline,
        };
        let revoke = Authorization {
            is_authorized: false,
            nonce: nonce + U256::from(1u64),
            ..authorize
        };

        let chain_id = config.destination_chain;
        let grant_calldata =
            sign_authorization(&self.signer, authorize, chain_id, verifying_contract).await?;
        let revoke_calldata =
            sign_authorization(&self.signer, revoke, chain_id, verifying_contract).await?;

        let actions = vec![
            approve_action(config.output_token, morpho, config.amount),
            Action::new(
                morpho,
                supply_collateral_calldata(self.market, config.amount, recipient),
            )
            .with_update(Recompute::MorphoSupplyCollateral {
                market: self.market,
                on_behalf: recipient,
            }),
            Action::new(morpho, grant_calldata),
            Action::new(
                morpho,
                borrow_calldata(self.market, self.borrow_amount, recipient, recipient),
            ),
            Action::new(morpho, revoke_calldata),
        ];

        info!(
            action_count = actions.len(),
            nonce = %nonce,
            authorized = %handler,
            borrow_amount = %self.borrow_amount,
            event = "message_created"
        );

        Ok(CrossChainMessage::new(
            config.fallback_recipient_for(recipient),
            actions,
        ))
    }
}

#[async_trait]
impl MessageBuilder for MorphoBuilder {
    fn name(&self) -> &'static str {
        "morpho"
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
    use crate::chain::addresses::MULTICALL_HANDLER_ADDRESS;
    use crate::contracts::morpho::IMorpho;
    use crate::testing::FakeNonceSource;
    use alloy_sol_types::SolCall;

    fn builder(signer: PrivateKeySigner) -> MorphoBuilder {
        let nonces = FakeNonceSource::new();
        nonces.set_nonce(signer.address(), U256::from(4u64));
        MorphoBuilder::new(ExampleConfig::morpho(), signer, Arc::new(nonces))
    }

    #[tokio::test]
    async fn test_bundle_brackets_borrow_with_authorizations() {
        let signer = PrivateKeySigner::random();
        let user = signer.address();

        let message = builder(signer).create_message(user).await.unwrap();
        assert_eq!(message.actions.len(), 5);

        let grant =
            IMorpho::setAuthorizationWithSigCall::abi_decode(&message.actions[2].call_data)
                .unwrap();
        let revoke =
            IMorpho::setAuthorizationWithSigCall::abi_decode(&message.actions[4].call_data)
                .unwrap();

        assert!(grant.authorization.isAuthorized);
        assert_eq!(grant.authorization.nonce, U256::from(4u64));
        assert_eq!(grant.authorization.authorized, MULTICALL_HANDLER_ADDRESS);
        assert!(!revoke.authorization.isAuthorized);
        assert_eq!(revoke.authorization.nonce, U256::from(5u64));

        let borrow = IMorpho::borrowCall::abi_decode(&message.actions[3].call_data).unwrap();
        assert_eq!(borrow.assets, BORROW_AMOUNT);
        assert_eq!(borrow.receiver, user);
    }

    #[tokio::test]
    async fn test_only_supply_side_is_updated() {
        let signer = PrivateKeySigner::random();
        let user = signer.address();

        let message = builder(signer).create_message(user).await.unwrap();
        let updated: Vec<bool> = message
            .actions
            .iter()
            .map(|action| action.update != crate::message::UpdateKind::None)
            .collect();

        assert_eq!(updated, vec![true, true, false, false, false]);
    }

    #[tokio::test]
    async fn test_rejects_foreign_recipient() {
        let result = builder(PrivateKeySigner::random())
            .create_message(Address::repeat_byte(0x44))
            .await;
        assert!(matches!(result, Err(ActionsError::InvalidConfig(_))));
    }

    #[test]
    fn test_market_constants() {
        assert_eq!(MARKET_PARAMS.lltv, U256::from(860_000_000_000_000_000u64));
        assert_eq!(BORROW_AMOUNT, U256::from(1_000_000_000_000_000u64));
    }
}
