//! Destination action bundles, one builder per example
//!
//! Every builder implements [`MessageBuilder`](crate::traits::MessageBuilder).
//! Actions whose calldata depends on the bridged amount are built with the
//! configured amount and carry a [`Recompute`] update.

mod aave;
mod chi;
mod index_coop;
mod morpho;
mod swapmode;
mod template;

pub use aave::{AaveBuilder, AAVE_REFERRAL_CODE};
pub use chi::ChiProtocolBuilder;
pub use index_coop::{IndexCoopBuilder, INDEX_SLIPPAGE_PERCENT, USDC_DECIMALS};
pub use morpho::{MorphoBuilder, AUTHORIZATION_TTL_SECS, BORROW_AMOUNT, MARKET_PARAMS};
pub use swapmode::{
    SwapModeBuilder, SWAPMODE_DEX, SWAPMODE_POOL, SWAPMODE_TICK_LOWER, SWAPMODE_TICK_UPPER,
};
pub use template::TemplateBuilder;

use alloy_primitives::{Address, U256};

use crate::calldata::approve_calldata;
use crate::message::{Action, Recompute};

/// `approve(spender, amount)` on `token`, re-encoded for the bridged amount
pub(crate) fn approve_action(token: Address, spender: Address, amount: U256) -> Action {
    Action::new(token, approve_calldata(spender, amount)).with_update(Recompute::Approve { spender })
}
