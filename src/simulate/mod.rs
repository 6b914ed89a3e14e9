// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Forked-network simulation of an example's deposit and fill
//!
//! A [`Simulation`] forks the origin and destination chains, builds the
//! example's message for a fresh user, quotes and funds the deposit, then
//! executes it while replaying the relayer's fill on the destination fork.
//! The resulting [`SimulationOutcome`] says whether the destination calls ran.
//!
//! # Example
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
//! let simulation = Simulation::builder()
//!     .environment(TenderlyEnvironment::new(&settings, Arc::new(NoQuotes))?)
//!     .message_builder(TemplateBuilder::default())
//!     .user_signer(settings.user_signer())
//!     .build();
//!
//! let report = simulation.run().await?;
//! println!("{}", report.outcome);
//! # Ok(())
//! # }
//! ```

mod funding;
mod tenderly;
mod testnet_ids;

use std::fmt;

use alloy_primitives::TxHash;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use bon::Builder;
use tracing::{error, info, warn, Instrument};

use crate::across::{deposit_from_logs, ExecutionProgress, ExecutionStatus, QuoteDeposit};
use crate::traits::{
    BridgeClient, ForkWallet, MessageBuilder, ProgressObserver, SimulationEnvironment,
};
use crate::{spans, ActionsError, Result};

pub use funding::{fund_and_approve, FUNDING_AMOUNT};
pub use tenderly::{
    tenderly_tx_url, TenderlyClient, TenderlyEnvironment, TenderlyWallet, VirtualTestnet,
    TENDERLY_API, TENDERLY_DASHBOARD,
};
pub use testnet_ids::TestnetIdLog;

/// Chain the relayer asks to be repaid on (Base)
pub const REPAYMENT_CHAIN_ID: u64 = 8453;

/// What happened on the destination chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// The deposit was filled and every destination call succeeded
    ActionsSucceeded,
    /// The deposit was filled but the calls reverted; funds went to the
    /// fallback recipient
    ActionsFailed,
    /// No fill was observed within the polling window
    NotFilled,
}

impl fmt::Display for SimulationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionsSucceeded => write!(f, "actions_succeeded"),
            Self::ActionsFailed => write!(f, "actions_failed"),
            Self::NotFilled => write!(f, "not_filled"),
        }
    }
}

/// Result of a completed simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub origin_testnet: VirtualTestnet,
    pub destination_testnet: VirtualTestnet,
    /// The deposit as submitted, with exclusivity removed
    pub deposit: QuoteDeposit,
    pub outcome: SimulationOutcome,
    pub fill_tx_hash: Option<TxHash>,
}

/// One example run end to end on forked networks.
#[derive(Builder)]
pub struct Simulation<E: SimulationEnvironment, B: MessageBuilder> {
    environment: E,
    message_builder: B,
    /// Depositor on the origin chain, and the recipient the message is
    /// built for
    user_signer: PrivateKeySigner,
    #[builder(default = PrivateKeySigner::random())]
    relayer_signer: PrivateKeySigner,
    #[builder(default = REPAYMENT_CHAIN_ID)]
    repayment_chain_id: u64,
}

impl<E: SimulationEnvironment, B: MessageBuilder> Simulation<E, B> {
    /// Runs every step in order, stopping at the first error.
    ///
    /// A fill that never shows up is not an error; it is reported as
    /// [`SimulationOutcome::NotFilled`].
    pub async fn run(&self) -> Result<SimulationReport> {
        let config = self.message_builder.config();
        let span = spans::simulate(
            self.message_builder.name(),
            config.source_chain,
            config.destination_chain,
        );

        async move {
            let result = self.run_steps().await;
            match &result {
                Ok(report) => {
                    tracing::Span::current()
                        .record("outcome", tracing::field::display(report.outcome));
                }
                Err(e) => spans::record_error(e),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// [`run`](Self::run), logging any error instead of returning it
    pub async fn simulate(&self) -> Option<SimulationReport> {
        match self.run().await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(
                    example = self.message_builder.name(),
                    error = %e,
                    event = "simulation_failed"
                );
                None
            }
        }
    }

    async fn run_steps(&self) -> Result<SimulationReport> {
        let env = &self.environment;
        let config = self.message_builder.config();

        let origin = env.provision(config.source_chain).await?;
        let destination = env.provision(config.destination_chain).await?;

        let user = env
            .connect_wallet(&origin, self.user_signer.clone())
            .await?;
        let relayer = env
            .connect_wallet(&destination, self.relayer_signer.clone())
            .await?;

        let message = self.message_builder.create_message(user.address()).await?;

        let bridge = env.connect_bridge(&origin, &destination, &user).await?;
        let quote = bridge
            .get_quote(&config.route(), config.amount, &message)
            .await?;
        let deposit = quote.deposit.without_exclusivity();

        info!(
            input_amount = %deposit.input_amount,
            output_amount = %deposit.output_amount,
            actions = quote.message.actions.len(),
            event = "simulation_quote_ready"
        );

        fund_and_approve(env, &origin, &destination, &user, &relayer, &deposit).await?;

        let mut observer = FillReplayObserver {
            env,
            origin: &origin,
            destination: &destination,
            relayer: &relayer,
            deposit: &deposit,
            repayment_chain_id: self.repayment_chain_id,
            fill_tx_hash: None,
            action_success: None,
        };

        let outcome = match bridge.execute_quote(&deposit, &mut observer).await {
            Ok(()) => match observer.action_success {
                Some(true) => SimulationOutcome::ActionsSucceeded,
                Some(false) => SimulationOutcome::ActionsFailed,
                None => SimulationOutcome::NotFilled,
            },
            Err(ActionsError::FillTimeout { deposit_id }) => {
                warn!(deposit_id = deposit_id, event = "simulation_fill_timeout");
                SimulationOutcome::NotFilled
            }
            Err(e) => return Err(e),
        };

        info!(
            example = self.message_builder.name(),
            outcome = %outcome,
            event = "simulation_completed"
        );

        Ok(SimulationReport {
            fill_tx_hash: observer.fill_tx_hash,
            origin_testnet: origin,
            destination_testnet: destination,
            deposit,
            outcome,
        })
    }
}

/// Plays the relayer: once the deposit lands, fills it on the destination
/// fork so the bridge client's fill polling finds it.
struct FillReplayObserver<'a, E: SimulationEnvironment> {
    env: &'a E,
    origin: &'a VirtualTestnet,
    destination: &'a VirtualTestnet,
    relayer: &'a E::Wallet,
    deposit: &'a QuoteDeposit,
    repayment_chain_id: u64,
    fill_tx_hash: Option<TxHash>,
    action_success: Option<bool>,
}

impl<E: SimulationEnvironment> FillReplayObserver<'_, E> {
    async fn replay_fill(&mut self, logs: &[alloy_primitives::Log]) -> Result<()> {
        let relay_data =
            deposit_from_logs(self.deposit.origin_chain_id, self.deposit.spoke_pool, logs)?;
        let deposit_id = relay_data.depositId;

        let tx_hash = self
            .relayer
            .fill_relay(
                self.deposit.destination_spoke_pool,
                relay_data,
                self.repayment_chain_id,
            )
            .await?;

        info!(
            deposit_id = deposit_id,
            tx_url = %self.env.tx_url(self.destination, &tx_hash),
            event = "fill_replayed"
        );
        self.fill_tx_hash = Some(tx_hash);
        Ok(())
    }
}

#[async_trait]
impl<'a, E: SimulationEnvironment> ProgressObserver for FillReplayObserver<'a, E> {
    async fn on_progress(&mut self, progress: &ExecutionProgress) -> Result<()> {
        if let ExecutionStatus::Error(reason) = progress.status() {
            warn!(step = %progress.step(), reason = %reason, event = "execution_step_failed");
            return Ok(());
        }

        if let Some(tx_hash) = progress.tx_hash() {
            let testnet = match progress {
                ExecutionProgress::Fill { .. } => self.destination,
                _ => self.origin,
            };
            info!(
                step = %progress.step(),
                status = ?progress.status(),
                tx_url = %self.env.tx_url(testnet, &tx_hash),
                event = "execution_progress"
            );
        }

        match progress {
            ExecutionProgress::Deposit {
                status: ExecutionStatus::TxSuccess,
                logs,
                ..
            } => self.replay_fill(logs).await,
            ExecutionProgress::Fill {
                status: ExecutionStatus::TxSuccess,
                action_success,
                ..
            } => {
                self.action_success = *action_success;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
