//! Contract bindings
//!
//! Alloy-generated bindings for the contracts the action bundles and the
//! simulation interact with:
//!
//! - [`Erc20Contract`](erc20::Erc20Contract) for allowances and approvals
//! - [`SpokePoolContract`](spoke_pool::SpokePoolContract) for Across deposits and fills
//! - [`MorphoContract`](morpho::MorphoContract) for authorization nonces
//! - `IMulticallHandler` payload types for destination instructions

pub mod erc20;
pub mod morpho;
pub mod multicall_handler;
pub mod spoke_pool;
