//! Morpho Blue contract bindings
//!
//! Only the entry points used by the lending example are bound: collateral
//! supply, borrowing, signature-based authorization and the authorization nonce.

use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::debug;

use crate::traits::NonceSource;
use crate::Result;
use IMorpho::IMorphoInstance;

/// Read-only Morpho Blue wrapper used to fetch authorization nonces
pub struct MorphoContract<P: Provider<Ethereum>> {
    instance: IMorphoInstance<P>,
}

impl<P: Provider<Ethereum>> MorphoContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "morpho_contract_initialized"
        );
        Self {
            instance: IMorphoInstance::new(address, provider),
        }
    }

    /// Current `setAuthorizationWithSig` nonce of `authorizer`
    pub async fn nonce(&self, authorizer: Address) -> Result<U256> {
        let nonce = self.instance.nonce(authorizer).call().await?;

        debug!(
            authorizer = %authorizer,
            nonce = %nonce,
            contract_address = %self.instance.address(),
            event = "morpho_nonce_retrieved"
        );

        Ok(nonce)
    }
}

/// Reads nonces from whichever Morpho deployment the caller names, using a
/// single destination chain provider.
pub struct MorphoNonceReader<P> {
    provider: P,
}

impl<P> MorphoNonceReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> NonceSource for MorphoNonceReader<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    async fn nonce(&self, morpho: Address, authorizer: Address) -> Result<U256> {
        MorphoContract::new(morpho, self.provider.clone())
            .nonce(authorizer)
            .await
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    interface IMorpho {
        struct MarketParams {
            address loanToken;
            address collateralToken;
            address oracle;
            address irm;
            uint256 lltv;
        }

        struct Authorization {
            address authorizer;
            address authorized;
            bool isAuthorized;
            uint256 nonce;
            uint256 deadline;
        }

        struct Signature {
            uint8 v;
            bytes32 r;
            bytes32 s;
        }

        function supplyCollateral(MarketParams memory marketParams, uint256 assets, address onBehalf, bytes memory data) external;
        function borrow(MarketParams memory marketParams, uint256 assets, uint256 shares, address onBehalf, address receiver) external returns (uint256 assetsBorrowed, uint256 sharesBorrowed);
        function setAuthorizationWithSig(Authorization calldata authorization, Signature calldata signature) external;
        function nonce(address authorizer) external view returns (uint256);
    }
);
