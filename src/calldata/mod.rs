//! ABI calldata generators
//!
//! Pure functions from typed arguments to encoded calls. Identical arguments
//! always produce identical bytes, which is what lets an action be re-encoded
//! once the bridged amount is known.

mod decode;
mod erc20;
mod lending;
mod morpho;
mod signature;

pub use decode::decode_with_signature;
pub use erc20::approve_calldata;
pub use lending::{mint_with_weth_calldata, supply_calldata};
pub use morpho::{
    authorization_domain, borrow_calldata, set_authorization_with_sig_calldata,
    sign_authorization, supply_collateral_calldata, Authorization, MarketParams,
};
pub use signature::{split_signature, SplitSignature, SIGNATURE_HEX_LENGTH};
