//! # across-actions
//!
//! Cross-chain action bundles for Across deposits.
//!
//! An Across deposit can carry a message that the destination chain's
//! multicall handler executes right after the relayer's fill. This crate
//! builds those messages for a handful of DeFi integrations (Aave supply,
//! Morpho collateral and borrow, Index Coop flash mint, a KyberSwap zap, a
//! Chi Protocol mint), re-encodes them once the bridged amount is quoted,
//! and simulates the whole round trip on Tenderly virtual testnets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use across_actions::{MessageBuilder, NoQuotes, TemplateBuilder};
//! use alloy_primitives::{address, U256};
//!
//! # async fn example() -> across_actions::Result<()> {
//! let builder = TemplateBuilder::default();
//! let user = address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d");
//!
//! // Build with the configured amount, then resolve for the quoted one
//! let message = builder.create_message(user).await?;
//! let resolved = message.resolve(U256::from(9_990_000u64), &NoQuotes).await?;
//! let encoded = resolved.encode_instructions();
//! # Ok(())
//! # }
//! ```
//!
//! ## Simulation
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use across_actions::{
//!     NoQuotes, Simulation, SimulationSettings, TemplateBuilder, TenderlyEnvironment,
//! };
//!
//! # async fn example() -> across_actions::Result<()> {
//! let settings = SimulationSettings::from_env()?;
//! let report = Simulation::builder()
//!     .environment(TenderlyEnvironment::new(&settings, Arc::new(NoQuotes))?)
//!     .message_builder(TemplateBuilder::default())
//!     .user_signer(settings.user_signer())
//!     .build()
//!     .run()
//!     .await?;
//! println!("outcome: {}", report.outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`CrossChainMessage`] and [`Action`] - destination call bundles and their
//!   amount-dependent updates
//! - [`TemplateBuilder`], [`AaveBuilder`], [`MorphoBuilder`],
//!   [`IndexCoopBuilder`], [`SwapModeBuilder`], [`ChiProtocolBuilder`] -
//!   one [`MessageBuilder`] per example
//! - [`AcrossClient`] - quotes and executes deposits through the Across API
//! - [`Simulation`] and [`TenderlyEnvironment`] - forked-network runs
//! - [`calldata`] - pure ABI encoders used by the builders
//! - [`ActionsError`] and [`Result`] - error types for error handling

mod across;
mod builders;
pub mod calldata;
mod chain;
mod config;
mod contracts;
mod de;
mod error;
mod message;
mod provider;
mod quote;
mod simulate;

pub use across::{
    actions_succeeded, deposit_from_logs, receipt_logs, suggested_fees_url, AcrossClient,
    BridgeQuote, ExecutionProgress, ExecutionStatus, ExecutionStep, PollingConfig,
    QuoteDeposit, Route, SuggestedFees, ACROSS_API, DEFAULT_FILL_DEADLINE_BUFFER_SECS,
    SUGGESTED_FEES_PATH,
};
pub use builders::{
    AaveBuilder, ChiProtocolBuilder, IndexCoopBuilder, MorphoBuilder, SwapModeBuilder,
    TemplateBuilder, AAVE_REFERRAL_CODE, AUTHORIZATION_TTL_SECS, BORROW_AMOUNT,
    INDEX_SLIPPAGE_PERCENT, MARKET_PARAMS, SWAPMODE_DEX, SWAPMODE_POOL, SWAPMODE_TICK_LOWER,
    SWAPMODE_TICK_UPPER, USDC_DECIMALS,
};
pub use chain::{eligible_chain, rpc_url, EligibleChain, RPC_URL_ENV_PREFIX};
pub use config::{
    ExampleConfig, SimulationSettings, ARBITRUM_USDC, ARBITRUM_WETH, BASE_AAVE_POOL, BASE_ICUSD,
    BASE_USDC, BASE_WETH, DEFAULT_TESTNET_IDS_PATH,
};
pub use contracts::{
    erc20::Erc20Contract,
    morpho::{MorphoContract, MorphoNonceReader},
    spoke_pool::{tag_integrator, SpokePoolContract},
};
pub use error::{ActionsError, Result};
pub use message::{
    Action, ActionOverride, CrossChainMessage, Recompute, ResolvedAction, ResolvedMessage,
    UpdateKind,
};
pub use provider::{http_client, DEFAULT_TIMEOUT_SECS};
pub use quote::{
    index_token_amount, require_quote, IndexCoopQuoteProvider, KyberZapQuoteProvider, NoQuotes,
    QuoteKind, QuoteProvider, QuoteRequest, QuoteTx, INDEX_COOP_API, KYBERSWAP_ZAP_API,
};
pub use simulate::{
    fund_and_approve, tenderly_tx_url, Simulation, SimulationOutcome, SimulationReport,
    TenderlyClient, TenderlyEnvironment, TenderlyWallet, TestnetIdLog, VirtualTestnet,
    FUNDING_AMOUNT, REPAYMENT_CHAIN_ID, TENDERLY_API, TENDERLY_DASHBOARD,
};
pub use traits::{
    BridgeClient, ForkWallet, MessageBuilder, NonceSource, ProgressObserver,
    SimulationEnvironment,
};

// Public module for advanced users who need custom instrumentation
pub mod spans;
pub mod testing;
pub mod traits;
