//! Chain configuration and contract addresses
//!
//! This module contains the static chain-id → metadata mapping for every
//! network the examples can bridge between.

pub(crate) mod addresses;
mod eligible;

pub use eligible::{eligible_chain, rpc_url, EligibleChain, RPC_URL_ENV_PREFIX};
