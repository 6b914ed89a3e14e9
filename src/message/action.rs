use alloy_primitives::{Address, Bytes, U256};

use crate::calldata::{
    approve_calldata, mint_with_weth_calldata, supply_calldata, supply_collateral_calldata,
    MarketParams,
};
use crate::quote::{require_quote, QuoteProvider, QuoteRequest};
use crate::Result;

/// A single call the multicall handler makes on the destination chain.
///
/// `call_data` and `value` are computed with the placeholder amount the bundle
/// was built with. If `update` is [`UpdateKind::Recompute`], they are
/// regenerated once the actual bridged amount is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub target: Address,
    pub call_data: Bytes,
    pub value: U256,
    pub update: UpdateKind,
}

impl Action {
    /// A zero-value call that is sent as built
    pub fn new(target: Address, call_data: Bytes) -> Self {
        Self {
            target,
            call_data,
            value: U256::ZERO,
            update: UpdateKind::None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_update(mut self, recompute: Recompute) -> Self {
        self.update = UpdateKind::Recompute(recompute);
        self
    }

    /// Produces the call to execute for `output_amount`, leaving `self` untouched.
    pub async fn resolve<Q>(&self, output_amount: U256, quotes: &Q) -> Result<ResolvedAction>
    where
        Q: QuoteProvider + ?Sized,
    {
        let resolved = ResolvedAction {
            target: self.target,
            call_data: self.call_data.clone(),
            value: self.value,
        };

        match &self.update {
            UpdateKind::None => Ok(resolved),
            UpdateKind::Recompute(recompute) => {
                let update = recompute.apply(output_amount, quotes).await?;
                Ok(resolved.overridden_by(update))
            }
        }
    }
}

/// Whether an action depends on the bridged amount
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UpdateKind {
    #[default]
    None,
    Recompute(Recompute),
}

/// How to regenerate an action for the bridged amount.
///
/// Each variant names a calldata generator and holds every argument except
/// the amount.
#[derive(Debug, Clone, PartialEq)]
pub enum Recompute {
    /// `approve(spender, amount)`
    Approve { spender: Address },
    /// Chi `mintWithWETH(amount, receiver)`
    ChiMint { receiver: Address },
    /// Morpho `supplyCollateral(market, amount, onBehalf, "")`
    MorphoSupplyCollateral {
        market: MarketParams,
        on_behalf: Address,
    },
    /// Aave `supply(asset, amount, onBehalf, referralCode)`
    AaveSupply {
        asset: Address,
        on_behalf: Address,
        referral_code: u16,
    },
    /// Re-run an external quote; may also change the target and value
    Quote(QuoteRequest),
}

impl Recompute {
    /// Computes the replacement fields for `output_amount`.
    ///
    /// # Errors
    ///
    /// Only quote lookups can fail; an empty quote is
    /// [`ActionsError::QuoteUnavailable`](crate::ActionsError::QuoteUnavailable).
    pub async fn apply<Q>(&self, output_amount: U256, quotes: &Q) -> Result<ActionOverride>
    where
        Q: QuoteProvider + ?Sized,
    {
        let call_data = match self {
            Self::Approve { spender } => approve_calldata(*spender, output_amount),
            Self::ChiMint { receiver } => mint_with_weth_calldata(output_amount, *receiver),
            Self::MorphoSupplyCollateral { market, on_behalf } => {
                supply_collateral_calldata(*market, output_amount, *on_behalf)
            }
            Self::AaveSupply {
                asset,
                on_behalf,
                referral_code,
            } => supply_calldata(*asset, output_amount, *on_behalf, *referral_code),
            Self::Quote(request) => {
                let tx = require_quote(quotes, &request.with_amount(output_amount)).await?;
                return Ok(ActionOverride {
                    to: Some(tx.to),
                    call_data: Some(tx.data),
                    value: Some(tx.value),
                });
            }
        };

        Ok(ActionOverride {
            call_data: Some(call_data),
            ..Default::default()
        })
    }
}

/// Replacement fields produced by an update; `None` keeps the original
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionOverride {
    pub to: Option<Address>,
    pub call_data: Option<Bytes>,
    pub value: Option<U256>,
}

/// A call with its final target, calldata and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub target: Address,
    pub call_data: Bytes,
    pub value: U256,
}

impl ResolvedAction {
    fn overridden_by(self, update: ActionOverride) -> Self {
        Self {
            target: update.to.unwrap_or(self.target),
            call_data: update.call_data.unwrap_or(self.call_data),
            value: update.value.unwrap_or(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::erc20::Erc20::approveCall;
    use crate::quote::NoQuotes;
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;

    #[tokio::test]
    async fn test_approve_update_changes_only_amount() {
        let token = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
        let spender = address!("BBBBBbbBBb9cC5e90e3b3Af64bdAF62C37EEFFCb");
        let action = Action::new(token, approve_calldata(spender, U256::from(10_000_000u64)))
            .with_update(Recompute::Approve { spender });

        let resolved = action
            .resolve(U256::from(9_990_000u64), &NoQuotes)
            .await
            .unwrap();

        assert_eq!(resolved.target, token);
        assert_eq!(resolved.value, U256::ZERO);
        assert_eq!(&resolved.call_data[..4], &action.call_data[..4]);

        let before = approveCall::abi_decode(&action.call_data).unwrap();
        let after = approveCall::abi_decode(&resolved.call_data).unwrap();
        assert_eq!(before.spender, after.spender);
        assert_eq!(after.amount, U256::from(9_990_000u64));
    }

    #[tokio::test]
    async fn test_action_without_update_is_unchanged() {
        let action = Action::new(Address::repeat_byte(1), Bytes::from_static(&[1, 2, 3]))
            .with_value(U256::from(5u64));

        let resolved = action.resolve(U256::from(1u64), &NoQuotes).await.unwrap();

        assert_eq!(resolved.target, action.target);
        assert_eq!(resolved.call_data, action.call_data);
        assert_eq!(resolved.value, U256::from(5u64));
    }

    #[test]
    fn test_override_keeps_missing_fields() {
        let original = ResolvedAction {
            target: Address::repeat_byte(1),
            call_data: Bytes::from_static(&[1]),
            value: U256::from(1u64),
        };

        let updated = original.clone().overridden_by(ActionOverride {
            value: Some(U256::from(2u64)),
            ..Default::default()
        });

        assert_eq!(updated.target, original.target);
        assert_eq!(updated.call_data, original.call_data);
        assert_eq!(updated.value, U256::from(2u64));
    }
}
