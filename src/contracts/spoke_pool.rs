//! Across V3 SpokePool contract bindings and wrapper
//!
//! Deposits happen on the origin spoke pool, fills on the destination spoke
//! pool. The wrapper only builds transaction requests and queries logs; signing
//! and sending is left to the provider's wallet.

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{Filter, Log, TransactionRequest};
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::{debug, info};

use crate::across::QuoteDeposit;
use crate::Result;
use ISpokePool::{depositV3Call, FilledV3Relay, ISpokePoolInstance, V3RelayData};

/// Marker Across uses to find integrator ids appended to deposit calldata
pub const INTEGRATOR_DELIMITER: [u8; 3] = hex!("1dc0de");

/// Integrator id attached to every deposit made by these examples
pub const INTEGRATOR_ID: [u8; 2] = hex!("003a");

/// Across V3 SpokePool wrapper
pub struct SpokePoolContract<P: Provider<Ethereum>> {
    instance: ISpokePoolInstance<P>,
}

impl<P: Provider<Ethereum>> SpokePoolContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "spoke_pool_contract_initialized"
        );
        Self {
            instance: ISpokePoolInstance::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    /// Builds the `depositV3` transaction for a quoted deposit, tagged with the
    /// integrator id.
    pub fn deposit_v3_transaction(&self, deposit: &QuoteDeposit) -> TransactionRequest {
        let call = depositV3Call {
            depositor: deposit.depositor,
            recipient: deposit.recipient,
            inputToken: deposit.input_token,
            outputToken: deposit.output_token,
            inputAmount: deposit.input_amount,
            outputAmount: deposit.output_amount,
            destinationChainId: U256::from(deposit.destination_chain_id),
            exclusiveRelayer: deposit.exclusive_relayer,
            quoteTimestamp: deposit.quote_timestamp,
            fillDeadline: deposit.fill_deadline,
            exclusivityDeadline: deposit.exclusivity_deadline,
            message: deposit.message.clone(),
        };

        let input = tag_integrator(&call.abi_encode());

        info!(
            depositor = %deposit.depositor,
            recipient = %deposit.recipient,
            input_token = %deposit.input_token,
            input_amount = %deposit.input_amount,
            output_amount = %deposit.output_amount,
            destination_chain_id = deposit.destination_chain_id,
            message_length_bytes = deposit.message.len(),
            spoke_pool = %self.address(),
            event = "deposit_transaction_created"
        );

        TransactionRequest::default()
            .with_from(deposit.depositor)
            .with_to(self.address())
            .with_input(input)
    }

    /// Builds the relayer's `fillV3Relay` transaction for a deposit
    pub fn fill_v3_relay_transaction(
        &self,
        relayer: Address,
        relay_data: V3RelayData,
        repayment_chain_id: u64,
    ) -> TransactionRequest {
        info!(
            relayer = %relayer,
            deposit_id = relay_data.depositId,
            origin_chain_id = %relay_data.originChainId,
            repayment_chain_id = repayment_chain_id,
            spoke_pool = %self.address(),
            event = "fill_transaction_created"
        );

        self.instance
            .fillV3Relay(relay_data, U256::from(repayment_chain_id))
            .from(relayer)
            .into_transaction_request()
    }

    /// Looks for a `FilledV3Relay` log for `(origin_chain_id, deposit_id)`
    /// emitted at or after `from_block`.
    pub async fn find_fill(
        &self,
        origin_chain_id: u64,
        deposit_id: u32,
        from_block: u64,
    ) -> Result<Option<Log>> {
        let filter = Filter::new()
            .address(self.address())
            .event_signature(FilledV3Relay::SIGNATURE_HASH)
            .topic1(B256::from(U256::from(origin_chain_id)))
            .topic2(B256::from(U256::from(deposit_id)))
            .from_block(from_block);

        let logs = self.instance.provider().get_logs(&filter).await?;

        debug!(
            origin_chain_id = origin_chain_id,
            deposit_id = deposit_id,
            from_block = from_block,
            matching_logs = logs.len(),
            event = "fill_logs_queried"
        );

        Ok(logs.into_iter().next())
    }
}

/// Appends the integrator delimiter and id to encoded calldata
pub fn tag_integrator(calldata: &[u8]) -> Bytes {
    let mut tagged =
        Vec::with_capacity(calldata.len() + INTEGRATOR_DELIMITER.len() + INTEGRATOR_ID.len());
    tagged.extend_from_slice(calldata);
    tagged.extend_from_slice(&INTEGRATOR_DELIMITER);
    tagged.extend_from_slice(&INTEGRATOR_ID);
    tagged.into()
}

sol!(
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    #[sol(rpc, all_derives)]
    interface ISpokePool {
        struct V3RelayData {
            address depositor;
            address recipient;
            address exclusiveRelayer;
            address inputToken;
            address outputToken;
            uint256 inputAmount;
            uint256 outputAmount;
            uint256 originChainId;
            uint32 depositId;
            uint32 fillDeadline;
            uint32 exclusivityDeadline;
            bytes message;
        }

        struct V3RelayExecutionEventInfo {
            address updatedRecipient;
            bytes updatedMessage;
            uint256 updatedOutputAmount;
            uint8 fillType;
        }

        event V3FundsDeposited(
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 indexed destinationChainId,
            uint32 indexed depositId,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            address indexed depositor,
            address recipient,
            address exclusiveRelayer,
            bytes message
        );

        event FilledV3Relay(
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 repaymentChainId,
            uint256 indexed originChainId,
            uint32 indexed depositId,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            address exclusiveRelayer,
            address indexed relayer,
            address depositor,
            address recipient,
            bytes message,
            V3RelayExecutionEventInfo relayExecutionInfo
        );

        function depositV3(
            address depositor,
            address recipient,
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 destinationChainId,
            address exclusiveRelayer,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes calldata message
        ) external payable;

        function fillV3Relay(V3RelayData calldata relayData, uint256 repaymentChainId) external;
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrator_tag_is_appended() {
        let tagged = tag_integrator(&[0xaa, 0xbb]);
        insta::assert_snapshot!(tagged.to_string(), @"0xaabb1dc0de003a");
    }
}
