//! Test utilities and fake implementations of the crate's trait seams
//!
//! These fakes stand in for quote APIs, Morpho nonce reads, the Across client
//! and Tenderly virtual testnets, so bundles and whole simulations can be
//! exercised without network access. Every fake is `Clone` and shares its
//! state, so a test can hand one copy to the code under test and inspect the
//! other afterwards.

use alloy_primitives::{Address, Bytes, Log, TxHash, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::across::{BridgeQuote, ExecutionProgress, ExecutionStatus, QuoteDeposit, Route};
use crate::chain::{eligible_chain, EligibleChain};
use crate::contracts::spoke_pool::ISpokePool::{V3FundsDeposited, V3RelayData};
use crate::message::CrossChainMessage;
use crate::quote::{QuoteProvider, QuoteRequest, QuoteTx};
use crate::simulate::{tenderly_tx_url, VirtualTestnet};
use crate::traits::{
    BridgeClient, ForkWallet, NonceSource, ProgressObserver, SimulationEnvironment,
};
use crate::{ActionsError, Result};

// ============================================================================
// Fake Quote Provider
// ============================================================================

/// A quote provider that answers from a queue of canned transactions.
///
/// Each call pops the next queued quote; an empty queue answers `Ok(None)`.
/// Every request is recorded.
#[derive(Clone, Debug, Default)]
pub struct FakeQuoteProvider {
    quotes: Arc<Mutex<VecDeque<QuoteTx>>>,
    requests: Arc<Mutex<Vec<QuoteRequest>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl FakeQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a quote for the next request
    pub fn push_quote(&self, quote: QuoteTx) {
        self.quotes.lock().unwrap().push_back(quote);
    }

    /// Make every request fail with `QuoteUnavailable`
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn requests(&self) -> Vec<QuoteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for FakeQuoteProvider {
    async fn quote(&self, request: &QuoteRequest) -> Result<Option<QuoteTx>> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(ActionsError::QuoteUnavailable { reason });
        }

        Ok(self.quotes.lock().unwrap().pop_front())
    }
}

// ============================================================================
// Fake Nonce Source
// ============================================================================

/// Morpho nonces keyed by authorizer; unknown authorizers read as zero.
#[derive(Clone, Debug, Default)]
pub struct FakeNonceSource {
    nonces: Arc<Mutex<HashMap<Address, U256>>>,
}

impl FakeNonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_nonce(&self, authorizer: Address, nonce: U256) {
        self.nonces.lock().unwrap().insert(authorizer, nonce);
    }
}

#[async_trait]
impl NonceSource for FakeNonceSource {
    async fn nonce(&self, _morpho: Address, authorizer: Address) -> Result<U256> {
        Ok(self
            .nonces
            .lock()
            .unwrap()
            .get(&authorizer)
            .copied()
            .unwrap_or_default())
    }
}

// ============================================================================
// Fake Bridge Client
// ============================================================================

/// Deposit id the fake bridge assigns to every deposit
pub const FAKE_DEPOSIT_ID: u32 = 1;

/// How the fake bridge's fill ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FakeFill {
    /// Filled, destination calls succeeded
    #[default]
    Succeeds,
    /// Filled, destination calls reverted
    ActionsFail,
    /// No fill observed
    TimesOut,
}

/// The `V3FundsDeposited` log the origin spoke pool would emit for `deposit`
pub fn deposit_log(deposit: &QuoteDeposit, deposit_id: u32) -> Log {
    let event = V3FundsDeposited {
        inputToken: deposit.input_token,
        outputToken: deposit.output_token,
        inputAmount: deposit.input_amount,
        outputAmount: deposit.output_amount,
        destinationChainId: U256::from(deposit.destination_chain_id),
        depositId: deposit_id,
        quoteTimestamp: deposit.quote_timestamp,
        fillDeadline: deposit.fill_deadline,
        exclusivityDeadline: deposit.exclusivity_deadline,
        depositor: deposit.depositor,
        recipient: deposit.recipient,
        exclusiveRelayer: deposit.exclusive_relayer,
        message: deposit.message.clone(),
    };

    Log {
        address: deposit.spoke_pool,
        data: event.encode_log_data(),
    }
}

/// A quoted deposit on `route` with a 0.1% fee, for fakes and tests
pub fn sample_deposit(route: &Route, depositor: Address, input_amount: U256) -> QuoteDeposit {
    QuoteDeposit {
        depositor,
        recipient: depositor,
        input_token: route.input_token,
        output_token: route.output_token,
        input_amount,
        output_amount: input_amount - input_amount / U256::from(1_000u64),
        origin_chain_id: route.origin_chain_id,
        destination_chain_id: route.destination_chain_id,
        spoke_pool: Address::repeat_byte(0x5a),
        destination_spoke_pool: Address::repeat_byte(0x5b),
        exclusive_relayer: Address::repeat_byte(0xee),
        exclusivity_deadline: 1_700_000_060,
        quote_timestamp: 1_700_000_000,
        fill_deadline: 1_700_021_600,
        message: Bytes::new(),
    }
}

/// A bridge client that quotes locally and scripts execution progress.
///
/// Quotes are built with [`sample_deposit`] and the message's unresolved
/// calls. Execution reports a successful approve and deposit, then ends as
/// configured with [`FakeBridgeClient::set_fill`]. Returning an error from
/// the observer aborts execution, as with the real client.
#[derive(Clone, Debug, Default)]
pub struct FakeBridgeClient {
    fill: Arc<Mutex<FakeFill>>,
    quote_failure: Arc<Mutex<Option<String>>>,
    quoted: Arc<Mutex<Vec<(Route, U256)>>>,
    executed: Arc<Mutex<Vec<QuoteDeposit>>>,
}

impl FakeBridgeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fill(&self, fill: FakeFill) {
        *self.fill.lock().unwrap() = fill;
    }

    /// Make `get_quote` fail with `QuoteUnavailable`
    pub fn fail_quotes(&self, reason: &str) {
        *self.quote_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn quoted(&self) -> Vec<(Route, U256)> {
        self.quoted.lock().unwrap().clone()
    }

    pub fn executed(&self) -> Vec<QuoteDeposit> {
        self.executed.lock().unwrap().clone()
    }

    fn hash(byte: u8) -> TxHash {
        B256::repeat_byte(byte)
    }
}

#[async_trait]
impl BridgeClient for FakeBridgeClient {
    async fn get_quote(
        &self,
        route: &Route,
        input_amount: U256,
        message: &CrossChainMessage,
    ) -> Result<BridgeQuote> {
        self.quoted.lock().unwrap().push((*route, input_amount));

        if let Some(reason) = self.quote_failure.lock().unwrap().clone() {
            return Err(ActionsError::QuoteUnavailable { reason });
        }

        let resolved = message.placeholder();
        let deposit = QuoteDeposit {
            message: resolved.encode_instructions(),
            ..sample_deposit(route, Address::ZERO, input_amount)
        };

        Ok(BridgeQuote {
            deposit,
            message: resolved,
            estimated_fill_time_secs: Some(4),
        })
    }

    async fn execute_quote(
        &self,
        deposit: &QuoteDeposit,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        self.executed.lock().unwrap().push(deposit.clone());
        let fill = *self.fill.lock().unwrap();

        observer
            .on_progress(&ExecutionProgress::approve(ExecutionStatus::Pending, None))
            .await?;
        observer
            .on_progress(&ExecutionProgress::approve(
                ExecutionStatus::TxSuccess,
                Some(Self::hash(0xa1)),
            ))
            .await?;
        observer
            .on_progress(&ExecutionProgress::deposit(ExecutionStatus::Pending, None))
            .await?;
        observer
            .on_progress(&ExecutionProgress::Deposit {
                status: ExecutionStatus::TxSuccess,
                tx_hash: Some(Self::hash(0xd1)),
                logs: vec![deposit_log(deposit, FAKE_DEPOSIT_ID)],
            })
            .await?;
        observer
            .on_progress(&ExecutionProgress::fill(ExecutionStatus::Pending, None))
            .await?;

        let action_success = match fill {
            FakeFill::Succeeds => true,
            FakeFill::ActionsFail => false,
            FakeFill::TimesOut => {
                let error = ActionsError::FillTimeout {
                    deposit_id: FAKE_DEPOSIT_ID,
                };
                observer
                    .on_progress(&ExecutionProgress::fill(
                        ExecutionStatus::Error(error.to_string()),
                        None,
                    ))
                    .await?;
                return Err(error);
            }
        };

        observer
            .on_progress(&ExecutionProgress::Fill {
                status: ExecutionStatus::TxSuccess,
                tx_hash: Some(Self::hash(0xf1)),
                action_success: Some(action_success),
            })
            .await
    }
}

// ============================================================================
// Fake Fork Wallet and Environment
// ============================================================================

/// A call made on a [`FakeForkWallet`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletCall {
    SetBalance {
        wallet: Address,
        amount: U256,
    },
    SetErc20Balance {
        wallet: Address,
        token: Address,
        amount: U256,
    },
    Approve {
        wallet: Address,
        token: Address,
        spender: Address,
        amount: U256,
    },
    FillRelay {
        wallet: Address,
        spoke_pool: Address,
        relay_data: V3RelayData,
        repayment_chain_id: u64,
    },
}

/// A fork wallet that records its calls in a log shared with its
/// environment. Hashes are numbered by position in the log.
#[derive(Clone, Debug)]
pub struct FakeForkWallet {
    address: Address,
    calls: Arc<Mutex<Vec<WalletCall>>>,
    fail_fills: bool,
}

impl FakeForkWallet {
    fn record(&self, call: WalletCall) -> TxHash {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        B256::left_padding_from(&(calls.len() as u64).to_be_bytes())
    }
}

#[async_trait]
impl ForkWallet for FakeForkWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn set_balance(&self, amount: U256) -> Result<TxHash> {
        Ok(self.record(WalletCall::SetBalance {
            wallet: self.address,
            amount,
        }))
    }

    async fn set_erc20_balance(&self, token: Address, amount: U256) -> Result<TxHash> {
        Ok(self.record(WalletCall::SetErc20Balance {
            wallet: self.address,
            token,
            amount,
        }))
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        Ok(self.record(WalletCall::Approve {
            wallet: self.address,
            token,
            spender,
            amount,
        }))
    }

    async fn fill_relay(
        &self,
        spoke_pool: Address,
        relay_data: V3RelayData,
        repayment_chain_id: u64,
    ) -> Result<TxHash> {
        if self.fail_fills {
            return Err(ActionsError::TransactionFailed {
                reason: "fill simulation reverted".to_string(),
            });
        }

        Ok(self.record(WalletCall::FillRelay {
            wallet: self.address,
            spoke_pool,
            relay_data,
            repayment_chain_id,
        }))
    }
}

/// A simulation environment with no network behind it.
///
/// Testnets are named `fake-<chain id>`; wallets share one call log and the
/// bridge is the [`FakeBridgeClient`] passed to [`FakeEnvironment::new`].
#[derive(Clone, Debug, Default)]
pub struct FakeEnvironment {
    bridge: FakeBridgeClient,
    provisioned: Arc<Mutex<Vec<u64>>>,
    wallet_calls: Arc<Mutex<Vec<WalletCall>>>,
    unavailable_chain: Arc<Mutex<Option<u64>>>,
    fail_fills: Arc<Mutex<bool>>,
}

impl FakeEnvironment {
    pub fn new(bridge: FakeBridgeClient) -> Self {
        Self {
            bridge,
            ..Self::default()
        }
    }

    /// Make provisioning `chain_id` fail
    pub fn fail_provisioning(&self, chain_id: u64) {
        *self.unavailable_chain.lock().unwrap() = Some(chain_id);
    }

    /// Make every relayer fill revert
    pub fn fail_fills(&self) {
        *self.fail_fills.lock().unwrap() = true;
    }

    pub fn provisioned(&self) -> Vec<u64> {
        self.provisioned.lock().unwrap().clone()
    }

    pub fn wallet_calls(&self) -> Vec<WalletCall> {
        self.wallet_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimulationEnvironment for FakeEnvironment {
    type Wallet = FakeForkWallet;
    type Bridge = FakeBridgeClient;

    async fn provision(&self, chain_id: u64) -> Result<VirtualTestnet> {
        if *self.unavailable_chain.lock().unwrap() == Some(chain_id) {
            return Err(ActionsError::Provisioning {
                reason: format!("no capacity for chain {chain_id}"),
            });
        }

        let tenderly_name = eligible_chain(chain_id)?.tenderly_name()?;
        self.provisioned.lock().unwrap().push(chain_id);

        Ok(VirtualTestnet {
            id: format!("fake-{chain_id}"),
            chain_id,
            rpc_url: Url::parse("http://localhost:8545")?,
            account: "fake".to_string(),
            project: "fake".to_string(),
            tenderly_name,
        })
    }

    async fn connect_wallet(
        &self,
        _testnet: &VirtualTestnet,
        signer: PrivateKeySigner,
    ) -> Result<Self::Wallet> {
        Ok(FakeForkWallet {
            address: signer.address(),
            calls: Arc::clone(&self.wallet_calls),
            fail_fills: *self.fail_fills.lock().unwrap(),
        })
    }

    async fn connect_bridge(
        &self,
        _origin: &VirtualTestnet,
        _destination: &VirtualTestnet,
        _depositor: &Self::Wallet,
    ) -> Result<Self::Bridge> {
        Ok(self.bridge.clone())
    }

    fn tx_url(&self, testnet: &VirtualTestnet, tx_hash: &TxHash) -> String {
        tenderly_tx_url(testnet, tx_hash)
    }
}

// ============================================================================
// Recording Observer
// ============================================================================

/// Keeps every progress event it sees
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ExecutionProgress>,
}

#[async_trait]
impl ProgressObserver for RecordingObserver {
    async fn on_progress(&mut self, progress: &ExecutionProgress) -> Result<()> {
        self.events.push(progress.clone());
        Ok(())
    }
}
