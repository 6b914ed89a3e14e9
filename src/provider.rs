// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider and HTTP client utilities.
//!
//! Every transaction the library sends is first executed with `eth_call`, so a
//! revert surfaces with its reason before anything is broadcast.

use alloy_network::{Ethereum, ReceiptResponse};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, Instrument};

use crate::error::{ActionsError, Result};
use crate::spans;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client used for the Across, Tenderly and quote APIs.
pub fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()?)
}

/// Executes `tx` with `eth_call` against the latest block.
///
/// # Errors
///
/// Returns [`ActionsError::TransactionFailed`] if the call reverts.
pub async fn simulate_transaction<P: Provider<Ethereum>>(
    provider: &P,
    tx: &TransactionRequest,
    step: &str,
) -> Result<()> {
    match provider.call(tx.clone()).await {
        Ok(_) => {
            debug!(step = step, event = "transaction_simulated");
            Ok(())
        }
        Err(e) => {
            spans::record_error_with_context(
                "SimulationReverted",
                &e.to_string(),
                Some(&format!("{step} transaction reverted in eth_call")),
            );
            error!(step = step, error = %e, event = "transaction_simulation_failed");
            Err(ActionsError::TransactionFailed {
                reason: format!("{step} simulation reverted: {e}"),
            })
        }
    }
}

/// Sends `tx` through the provider's wallet and waits for the receipt.
///
/// # Errors
///
/// Returns [`ActionsError::TransactionFailed`] if the transaction was mined
/// but reverted.
pub async fn send_transaction<P: Provider<Ethereum>>(
    provider: &P,
    tx: TransactionRequest,
    step: &str,
    chain_id: u64,
) -> Result<TransactionReceipt> {
    let span = spans::send_transaction(step, chain_id);
    async move {
        let pending = provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        spans::record_tx_hash(&tx_hash);

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            spans::record_error_with_context(
                "TransactionReverted",
                &format!("{step} transaction {tx_hash} reverted"),
                None,
            );
            error!(tx_hash = %tx_hash, step = step, event = "transaction_reverted");
            return Err(ActionsError::TransactionFailed {
                reason: format!("{step} transaction {tx_hash} reverted"),
            });
        }

        info!(
            tx_hash = %tx_hash,
            step = step,
            chain_id = chain_id,
            gas_used = receipt.gas_used,
            event = "transaction_confirmed"
        );

        Ok(receipt)
    }
    .instrument(span)
    .await
}

/// Simulates `tx`, then sends it. See [`simulate_transaction`] and
/// [`send_transaction`].
pub async fn simulate_and_send<P: Provider<Ethereum>>(
    provider: &P,
    tx: TransactionRequest,
    step: &str,
    chain_id: u64,
) -> Result<TransactionReceipt> {
    simulate_transaction(provider, &tx, step).await?;
    send_transaction(provider, tx, step, chain_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
    }
}
