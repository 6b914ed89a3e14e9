use alloy_primitives::{TxHash, U256};
use tracing::info;

use super::tenderly::VirtualTestnet;
use crate::across::QuoteDeposit;
use crate::traits::{ForkWallet, SimulationEnvironment};
use crate::Result;

/// Native balance given to each simulated wallet (1000 ether)
pub const FUNDING_AMOUNT: U256 = U256::from_limbs([0x35c9_adc5_dea0_0000, 0x36, 0, 0]);

/// Funds both wallets and approves both spoke pools for `deposit`.
///
/// Runs one step at a time, in order: native balance for the user and the
/// relayer, the deposit's input token for the user and output token for the
/// relayer, then the user's approval of the origin spoke pool and the
/// relayer's approval of the destination spoke pool. Returns the hashes in
/// that order.
pub async fn fund_and_approve<E: SimulationEnvironment>(
    env: &E,
    origin: &VirtualTestnet,
    destination: &VirtualTestnet,
    user: &E::Wallet,
    relayer: &E::Wallet,
    deposit: &QuoteDeposit,
) -> Result<Vec<TxHash>> {
    let mut hashes = Vec::with_capacity(6);

    let tx_hash = user.set_balance(FUNDING_AMOUNT).await?;
    log_step(env, origin, &tx_hash, "user_funded");
    hashes.push(tx_hash);

    let tx_hash = relayer.set_balance(FUNDING_AMOUNT).await?;
    log_step(env, destination, &tx_hash, "relayer_funded");
    hashes.push(tx_hash);

    let tx_hash = user
        .set_erc20_balance(deposit.input_token, deposit.input_amount)
        .await?;
    log_step(env, origin, &tx_hash, "user_input_token_funded");
    hashes.push(tx_hash);

    let tx_hash = relayer
        .set_erc20_balance(deposit.output_token, deposit.output_amount)
        .await?;
    log_step(env, destination, &tx_hash, "relayer_output_token_funded");
    hashes.push(tx_hash);

    let tx_hash = user
        .approve(deposit.input_token, deposit.spoke_pool, deposit.input_amount)
        .await?;
    log_step(env, origin, &tx_hash, "user_approved_spoke_pool");
    hashes.push(tx_hash);

    let tx_hash = relayer
        .approve(
            deposit.output_token,
            deposit.destination_spoke_pool,
            deposit.output_amount,
        )
        .await?;
    log_step(env, destination, &tx_hash, "relayer_approved_spoke_pool");
    hashes.push(tx_hash);

    Ok(hashes)
}

fn log_step<E: SimulationEnvironment>(
    env: &E,
    testnet: &VirtualTestnet,
    tx_hash: &TxHash,
    event: &'static str,
) {
    info!(
        testnet_id = %testnet.id,
        tx_url = %env.tx_url(testnet, tx_hash),
        event = event
    );
}
