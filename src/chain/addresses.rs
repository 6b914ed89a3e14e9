// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract addresses and public endpoints for the chains the examples run on
//!
//! This module centralizes the Across multicall handler and Morpho Blue
//! deployments, plus the default public RPC endpoints used when no
//! `RPC_URL_<chain id>` override is configured.

use alloy_primitives::{address, Address};

// Across MulticallHandler Addresses

/// <https://docs.across.to/reference/contract-addresses>
pub const MULTICALL_HANDLER_ADDRESS: Address =
    address!("924a9f036260DdD5808007E1AA95f08eD08aA569");

/// <https://lineascan.build/address/0x1015c58894961F4F7Dd7D68ba033e28Ed3ee1cDB>
pub const LINEA_MULTICALL_HANDLER_ADDRESS: Address =
    address!("1015c58894961F4F7Dd7D68ba033e28Ed3ee1cDB");

// Morpho Blue Addresses

/// <https://docs.morpho.org/overview/resources/addresses>
///
/// Same deployment on Ethereum and Base.
pub const MORPHO_BLUE_ADDRESS: Address = address!("BBBBBbbBBb9cC5e90e3b3Af64bdAF62C37EEFFCb");

// Default RPC endpoints

pub const ARBITRUM_RPC_URL: &str = "https://arb1.arbitrum.io/rpc";

pub const BASE_RPC_URL: &str = "https://mainnet.base.org";

pub const ETHEREUM_RPC_URL: &str = "https://eth.merkle.io";

pub const POLYGON_RPC_URL: &str = "https://polygon-rpc.com";

pub const LINEA_RPC_URL: &str = "https://rpc.linea.build";

pub const SEPOLIA_RPC_URL: &str = "https://sepolia.drpc.org";

pub const BASE_SEPOLIA_RPC_URL: &str = "https://sepolia.base.org";
