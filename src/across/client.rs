use std::sync::Arc;
use std::time::Duration;

use alloy_network::Ethereum;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::Log;
use async_trait::async_trait;
use bon::Builder;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, error, info, Instrument};
use url::Url;

use super::api::{suggested_fees_url, SuggestedFees, ACROSS_API};
use super::logs::{actions_succeeded, deposit_from_logs, receipt_logs};
use super::polling::PollingConfig;
use super::types::{BridgeQuote, ExecutionProgress, ExecutionStatus, QuoteDeposit, Route};
use crate::chain::{eligible_chain, EligibleChain};
use crate::contracts::erc20::Erc20Contract;
use crate::contracts::spoke_pool::SpokePoolContract;
use crate::message::CrossChainMessage;
use crate::provider::{send_transaction, simulate_transaction};
use crate::quote::{NoQuotes, QuoteProvider};
use crate::traits::{BridgeClient, ProgressObserver};
use crate::{spans, ActionsError, Result};

/// Across client for a single origin/destination provider pair
///
/// Quotes come from the Across app API; deposits are sent through the origin
/// provider's wallet and fills are observed on the destination provider.
///
/// # Example
///
/// ```rust,no_run
/// # use across_actions::{AcrossClient, ActionsError, BridgeClient, CrossChainMessage, Route};
/// # use alloy_primitives::{address, U256};
/// # use alloy_provider::ProviderBuilder;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AcrossClient::builder()
///     .origin_provider(ProviderBuilder::new().connect("http://localhost:8545").await?)
///     .destination_provider(ProviderBuilder::new().connect("http://localhost:8546").await?)
///     .depositor(address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d"))
///     .build();
///
/// let route = Route::builder()
///     .origin_chain_id(42161)
///     .destination_chain_id(8453)
///     .input_token(address!("af88d065e77c8cC2239327C5EDb3A432268e5831"))
///     .output_token(address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"))
///     .build();
///
/// let message = CrossChainMessage::new(address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d"), vec![]);
/// let quote = client.get_quote(&route, U256::from(10_000_000u64), &message).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone)]
pub struct AcrossClient<P: Provider<Ethereum> + Clone> {
    origin_provider: P,
    destination_provider: P,
    depositor: Address,
    #[builder(into, default = ACROSS_API.to_string())]
    api_url: String,
    #[builder(default)]
    http: Client,
    #[builder(default = Arc::new(NoQuotes) as Arc<dyn QuoteProvider>)]
    quotes: Arc<dyn QuoteProvider>,
    #[builder(default)]
    polling: PollingConfig,
}

impl<P: Provider<Ethereum> + Clone> AcrossClient<P> {
    pub fn depositor(&self) -> Address {
        self.depositor
    }

    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    async fn request_quote(
        &self,
        route: &Route,
        input_amount: U256,
        message: &CrossChainMessage,
    ) -> Result<BridgeQuote> {
        eligible_chain(route.origin_chain_id)?;
        let destination = eligible_chain(route.destination_chain_id)?;

        let (recipient, placeholder) = if message.is_empty() {
            (self.depositor, Bytes::new())
        } else {
            (
                destination.multicall_handler_address()?,
                message.placeholder().encode_instructions(),
            )
        };

        let url = suggested_fees_url(
            &Url::parse(&self.api_url)?,
            route,
            input_amount,
            recipient,
            self.depositor,
            &placeholder,
        )?;
        let fees = self.suggested_fees(url).await?;

        if fees.is_amount_too_low {
            return Err(ActionsError::QuoteUnavailable {
                reason: format!("{input_amount} is too low to cover relay fees"),
            });
        }
        let destination_spoke_pool = fees.destination_spoke_pool_address.ok_or_else(|| {
            ActionsError::QuoteUnavailable {
                reason: "response did not name a destination spoke pool".to_string(),
            }
        })?;
        let output_amount = fees.output_amount(input_amount);

        let resolved = message.resolve(output_amount, self.quotes.as_ref()).await?;
        let encoded = if message.is_empty() {
            Bytes::new()
        } else {
            resolved.encode_instructions()
        };

        let deposit = QuoteDeposit {
            depositor: self.depositor,
            recipient,
            input_token: route.input_token,
            output_token: route.output_token,
            input_amount,
            output_amount,
            origin_chain_id: route.origin_chain_id,
            destination_chain_id: route.destination_chain_id,
            spoke_pool: fees.spoke_pool_address,
            destination_spoke_pool,
            exclusive_relayer: fees.exclusive_relayer,
            exclusivity_deadline: fees.exclusivity_deadline,
            quote_timestamp: fees.timestamp,
            fill_deadline: fees.fill_deadline(),
            message: encoded,
        };

        info!(
            input_amount = %input_amount,
            output_amount = %output_amount,
            recipient = %recipient,
            spoke_pool = %deposit.spoke_pool,
            destination_spoke_pool = %deposit.destination_spoke_pool,
            message_length_bytes = deposit.message.len(),
            expected_fill_time_secs = ?fees.expected_fill_time_sec,
            event = "quote_received"
        );

        Ok(BridgeQuote {
            deposit,
            message: resolved,
            estimated_fill_time_secs: fees.expected_fill_time_sec,
        })
    }

    async fn suggested_fees(&self, url: Url) -> Result<SuggestedFees> {
        debug!(url = %url, event = "suggested_fees_requested");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            spans::record_error_with_context(
                "QuoteUnavailable",
                &format!("Across API returned {status}"),
                Some(&body),
            );
            error!(
                status = %status,
                body = %body,
                event = "suggested_fees_request_failed"
            );
            return Err(ActionsError::QuoteUnavailable {
                reason: format!("Across API returned {status}: {body}"),
            });
        }

        Ok(response.json().await?)
    }

    async fn run_deposit(
        &self,
        deposit: &QuoteDeposit,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let from_block = self.destination_provider.get_block_number().await?;

        self.approve_if_needed(deposit, observer).await?;

        let spoke_pool = SpokePoolContract::new(deposit.spoke_pool, self.origin_provider.clone());
        let tx = spoke_pool.deposit_v3_transaction(deposit);

        observer
            .on_progress(&ExecutionProgress::deposit(ExecutionStatus::Pending, None))
            .await?;
        if let Err(e) = simulate_transaction(&self.origin_provider, &tx, "deposit").await {
            return report_failure(observer, ExecutionProgress::deposit, e).await;
        }
        observer
            .on_progress(&ExecutionProgress::deposit(
                ExecutionStatus::SimulationSuccess,
                None,
            ))
            .await?;

        let receipt = match send_transaction(
            &self.origin_provider,
            tx,
            "deposit",
            deposit.origin_chain_id,
        )
        .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                return report_failure(observer, ExecutionProgress::deposit, e).await;
            }
        };

        let logs = receipt_logs(&receipt);
        let relay_data = deposit_from_logs(deposit.origin_chain_id, deposit.spoke_pool, &logs)?;
        observer
            .on_progress(&ExecutionProgress::Deposit {
                status: ExecutionStatus::TxSuccess,
                tx_hash: Some(receipt.transaction_hash),
                logs,
            })
            .await?;

        info!(
            deposit_id = relay_data.depositId,
            tx_hash = %receipt.transaction_hash,
            from_block = from_block,
            event = "deposit_confirmed"
        );

        observer
            .on_progress(&ExecutionProgress::fill(ExecutionStatus::Pending, None))
            .await?;

        let fill = match self
            .wait_for_fill(deposit, relay_data.depositId, from_block)
            .await
        {
            Ok(fill) => fill,
            Err(e) => {
                return report_failure(observer, ExecutionProgress::fill, e).await;
            }
        };

        let fill_tx_hash = fill
            .transaction_hash
            .ok_or_else(|| ActionsError::TransactionFailed {
                reason: "fill log has no transaction hash".to_string(),
            })?;
        let fill_receipt = self
            .destination_provider
            .get_transaction_receipt(fill_tx_hash)
            .await?
            .ok_or_else(|| ActionsError::TransactionFailed {
                reason: format!("fill transaction {fill_tx_hash} has no receipt"),
            })?;
        let action_success = actions_succeeded(&receipt_logs(&fill_receipt));

        info!(
            deposit_id = relay_data.depositId,
            fill_tx_hash = %fill_tx_hash,
            action_success = action_success,
            event = "deposit_filled"
        );

        observer
            .on_progress(&ExecutionProgress::Fill {
                status: ExecutionStatus::TxSuccess,
                tx_hash: Some(fill_tx_hash),
                action_success: Some(action_success),
            })
            .await
    }

    async fn approve_if_needed(
        &self,
        deposit: &QuoteDeposit,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let token = Erc20Contract::new(deposit.input_token, self.origin_provider.clone());
        let allowance = token.allowance(deposit.depositor, deposit.spoke_pool).await?;
        if allowance >= deposit.input_amount {
            debug!(
                allowance = %allowance,
                required = %deposit.input_amount,
                event = "approval_not_needed"
            );
            return Ok(());
        }

        let tx =
            token.approve_transaction(deposit.depositor, deposit.spoke_pool, deposit.input_amount);

        observer
            .on_progress(&ExecutionProgress::approve(ExecutionStatus::Pending, None))
            .await?;
        if let Err(e) = simulate_transaction(&self.origin_provider, &tx, "approve").await {
            return report_failure(observer, ExecutionProgress::approve, e).await;
        }
        observer
            .on_progress(&ExecutionProgress::approve(
                ExecutionStatus::SimulationSuccess,
                None,
            ))
            .await?;

        match send_transaction(&self.origin_provider, tx, "approve", deposit.origin_chain_id).await {
            Ok(receipt) => {
                observer
                    .on_progress(&ExecutionProgress::approve(
                        ExecutionStatus::TxSuccess,
                        Some(receipt.transaction_hash),
                    ))
                    .await
            }
            Err(e) => {
                report_failure(observer, ExecutionProgress::approve, e).await
            }
        }
    }

    async fn wait_for_fill(
        &self,
        deposit: &QuoteDeposit,
        deposit_id: u32,
        from_block: u64,
    ) -> Result<Log> {
        let span = spans::wait_for_fill(
            deposit.origin_chain_id,
            deposit_id,
            self.polling.max_attempts,
            self.polling.poll_interval_secs,
        );

        async move {
            let spoke_pool = SpokePoolContract::new(
                deposit.destination_spoke_pool,
                self.destination_provider.clone(),
            );

            for attempt in 1..=self.polling.max_attempts {
                if let Some(log) = spoke_pool
                    .find_fill(deposit.origin_chain_id, deposit_id, from_block)
                    .await?
                {
                    return Ok(log);
                }

                debug!(
                    attempt = attempt,
                    max_attempts = self.polling.max_attempts,
                    event = "fill_not_found"
                );
                if attempt < self.polling.max_attempts {
                    sleep(Duration::from_secs(self.polling.poll_interval_secs)).await;
                }
            }

            spans::record_error_with_context(
                "FillTimeout",
                &format!("No fill for deposit {deposit_id}"),
                Some(&format!(
                    "Polled {} times over {} seconds",
                    self.polling.max_attempts,
                    self.polling.total_timeout_secs()
                )),
            );
            error!(
                deposit_id = deposit_id,
                total_timeout_secs = self.polling.total_timeout_secs(),
                event = "fill_timeout"
            );
            Err(ActionsError::FillTimeout { deposit_id })
        }
        .instrument(span)
        .await
    }
}

/// Reports a failed step to the observer, then returns the original error.
async fn report_failure<T>(
    observer: &mut dyn ProgressObserver,
    progress: fn(ExecutionStatus, Option<TxHash>) -> ExecutionProgress,
    error: ActionsError,
) -> Result<T> {
    observer
        .on_progress(&progress(ExecutionStatus::Error(error.to_string()), None))
        .await?;
    Err(error)
}

#[async_trait]
impl<P> BridgeClient for AcrossClient<P>
where
    P: Provider<Ethereum> + Clone,
{
    async fn get_quote(
        &self,
        route: &Route,
        input_amount: U256,
        message: &CrossChainMessage,
    ) -> Result<BridgeQuote> {
        let span = spans::get_quote(
            route.origin_chain_id,
            route.destination_chain_id,
            &input_amount,
        );
        self.request_quote(route, input_amount, message)
            .instrument(span)
            .await
    }

    async fn execute_quote(
        &self,
        deposit: &QuoteDeposit,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let span = spans::execute_quote(
            &deposit.depositor,
            &deposit.spoke_pool,
            &deposit.input_amount,
        );
        self.run_deposit(deposit, observer).instrument(span).await
    }
}
