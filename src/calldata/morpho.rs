//! Morpho Blue calldata and EIP-712 authorizations
//!
//! The multicall handler executes the borrow on the user's behalf, so the
//! bundle brackets it with a signed `setAuthorizationWithSig(true)` and a
//! second one revoking the authorization with the following nonce.

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_signer::Signer;
use alloy_sol_types::{Eip712Domain, SolCall, SolStruct};
use tracing::debug;

use super::signature::split_signature;
use crate::contracts::morpho::IMorpho;
use crate::Result;

/// Identifies a Morpho Blue market
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketParams {
    pub loan_token: Address,
    pub collateral_token: Address,
    pub oracle: Address,
    pub irm: Address,
    pub lltv: U256,
}

impl From<MarketParams> for IMorpho::MarketParams {
    fn from(market: MarketParams) -> Self {
        Self {
            loanToken: market.loan_token,
            collateralToken: market.collateral_token,
            oracle: market.oracle,
            irm: market.irm,
            lltv: market.lltv,
        }
    }
}

/// Morpho `Authorization` message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorization {
    pub authorizer: Address,
    pub authorized: Address,
    pub is_authorized: bool,
    pub nonce: U256,
    /// Unix timestamp after which the signature is rejected
    pub deadline: U256,
}

impl From<Authorization> for IMorpho::Authorization {
    fn from(auth: Authorization) -> Self {
        Self {
            authorizer: auth.authorizer,
            authorized: auth.authorized,
            isAuthorized: auth.is_authorized,
            nonce: auth.nonce,
            deadline: auth.deadline,
        }
    }
}

/// `supplyCollateral(market, assets, onBehalf, "")`
pub fn supply_collateral_calldata(market: MarketParams, assets: U256, on_behalf: Address) -> Bytes {
    IMorpho::supplyCollateralCall {
        marketParams: market.into(),
        assets,
        onBehalf: on_behalf,
        data: Bytes::new(),
    }
    .abi_encode()
    .into()
}

/// `borrow(market, assets, 0, onBehalf, receiver)`; shares are zero because
/// the amount is expressed in assets.
pub fn borrow_calldata(
    market: MarketParams,
    assets: U256,
    on_behalf: Address,
    receiver: Address,
) -> Bytes {
    IMorpho::borrowCall {
        marketParams: market.into(),
        assets,
        shares: U256::ZERO,
        onBehalf: on_behalf,
        receiver,
    }
    .abi_encode()
    .into()
}

/// `setAuthorizationWithSig(authorization, (v, r, s))`
pub fn set_authorization_with_sig_calldata(
    authorization: Authorization,
    v: u8,
    r: B256,
    s: B256,
) -> Bytes {
    IMorpho::setAuthorizationWithSigCall {
        authorization: authorization.into(),
        signature: IMorpho::Signature { v, r, s },
    }
    .abi_encode()
    .into()
}

/// EIP-712 domain Morpho Blue verifies authorizations against
pub fn authorization_domain(chain_id: u64, morpho: Address) -> Eip712Domain {
    Eip712Domain::new(None, None, Some(U256::from(chain_id)), Some(morpho), None)
}

/// Signs `authorization` with `signer` under the Morpho domain of `chain_id`
/// and returns the encoded `setAuthorizationWithSig` call.
pub async fn sign_authorization<S>(
    signer: &S,
    authorization: Authorization,
    chain_id: u64,
    morpho: Address,
) -> Result<Bytes>
where
    S: Signer + ?Sized,
{
    let domain = authorization_domain(chain_id, morpho);
    let hash = IMorpho::Authorization::from(authorization).eip712_signing_hash(&domain);

    let signature = signer.sign_hash(&hash).await?;
    let split = split_signature(&hex::encode_prefixed(signature.as_bytes()))?;

    debug!(
        authorizer = %authorization.authorizer,
        authorized = %authorization.authorized,
        is_authorized = authorization.is_authorized,
        nonce = %authorization.nonce,
        chain_id = chain_id,
        event = "morpho_authorization_signed"
    );

    Ok(set_authorization_with_sig_calldata(
        authorization,
        split.v,
        split.r,
        split.s,
    ))
}
