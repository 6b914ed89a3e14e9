//! Trait seams for bridging and simulation.
//!
//! Each external dependency of a run sits behind one of these traits: the
//! Across client, the forked network provider, the wallets funded on it and
//! the Morpho nonce lookup. Production implementations live in
//! [`crate::across`], [`crate::simulate`] and [`crate::contracts`]; test fakes
//! live in [`crate::testing`].
//!
//! # Example: Observing progress
//!
//! ```rust,ignore
//! use across_actions::{ExecutionProgress, ProgressObserver, Result};
//!
//! struct PrintProgress;
//!
//! #[async_trait::async_trait]
//! impl ProgressObserver for PrintProgress {
//!     async fn on_progress(&mut self, progress: &ExecutionProgress) -> Result<()> {
//!         println!("{} -> {:?}", progress.step(), progress.status());
//!         Ok(())
//!     }
//! }
//! ```

use alloy_primitives::{Address, TxHash, U256};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::across::{BridgeQuote, ExecutionProgress, QuoteDeposit, Route};
use crate::config::ExampleConfig;
use crate::contracts::spoke_pool::ISpokePool::V3RelayData;
use crate::error::Result;
use crate::message::CrossChainMessage;
use crate::simulate::VirtualTestnet;

/// Source of Morpho `setAuthorizationWithSig` nonces.
#[async_trait]
pub trait NonceSource: Send + Sync {
    /// Current nonce of `authorizer` on the Morpho deployment at `morpho`
    async fn nonce(&self, morpho: Address, authorizer: Address) -> Result<U256>;
}

/// Builds one example's destination action bundle.
///
/// Builders hold their [`ExampleConfig`] and whatever credentials or quote
/// sources they need; `create_message` can be called once per run.
#[async_trait]
pub trait MessageBuilder: Send + Sync {
    /// Short name used in logs and spans
    fn name(&self) -> &'static str;

    fn config(&self) -> &ExampleConfig;

    /// Builds the bundle for `recipient`, the account bridged funds end up
    /// working for on the destination chain.
    ///
    /// # Errors
    ///
    /// Returns an error if a quote or on-chain read the bundle depends on
    /// fails. The caller must not bridge in that case.
    async fn create_message(&self, recipient: Address) -> Result<CrossChainMessage>;
}

/// Receives progress events while a quote executes.
///
/// Returning an error aborts the execution.
#[async_trait]
pub trait ProgressObserver: Send {
    async fn on_progress(&mut self, progress: &ExecutionProgress) -> Result<()>;
}

/// Quotes and executes Across deposits that carry a destination message.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    /// Quotes `input_amount` over `route` and resolves `message` for the
    /// quoted output amount.
    async fn get_quote(
        &self,
        route: &Route,
        input_amount: U256,
        message: &CrossChainMessage,
    ) -> Result<BridgeQuote>;

    /// Approves and submits `deposit`, then waits for its fill, reporting each
    /// step to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionsError::FillTimeout`](crate::ActionsError::FillTimeout)
    /// if no fill is observed within the client's polling window.
    async fn execute_quote(
        &self,
        deposit: &QuoteDeposit,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()>;
}

/// A wallet on a forked network whose balances can be set directly.
#[async_trait]
pub trait ForkWallet: Send + Sync {
    fn address(&self) -> Address;

    /// Sets the native balance of this wallet
    async fn set_balance(&self, amount: U256) -> Result<TxHash>;

    /// Sets this wallet's `token` balance
    async fn set_erc20_balance(&self, token: Address, amount: U256) -> Result<TxHash>;

    /// Sends `approve(spender, amount)` on `token`
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    /// Fills a deposit on `spoke_pool` as the relayer, after simulating the
    /// fill with `eth_call`.
    async fn fill_relay(
        &self,
        spoke_pool: Address,
        relay_data: V3RelayData,
        repayment_chain_id: u64,
    ) -> Result<TxHash>;
}

/// Provider of forked networks, and of wallets and bridge clients on them.
#[async_trait]
pub trait SimulationEnvironment: Send + Sync {
    type Wallet: ForkWallet;
    type Bridge: BridgeClient;

    /// Creates a fork of `chain_id` at its latest block
    async fn provision(&self, chain_id: u64) -> Result<VirtualTestnet>;

    async fn connect_wallet(
        &self,
        testnet: &VirtualTestnet,
        signer: PrivateKeySigner,
    ) -> Result<Self::Wallet>;

    /// A bridge client depositing from `depositor` on `origin` and observing
    /// fills on `destination`
    async fn connect_bridge(
        &self,
        origin: &VirtualTestnet,
        destination: &VirtualTestnet,
        depositor: &Self::Wallet,
    ) -> Result<Self::Bridge>;

    /// Link to a transaction on a testnet, for logs
    fn tx_url(&self, testnet: &VirtualTestnet, tx_hash: &TxHash) -> String;
}
