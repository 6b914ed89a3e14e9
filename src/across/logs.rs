use alloy_primitives::{Address, Log, U256};
use alloy_rpc_types::TransactionReceipt;
use alloy_sol_types::SolEvent;
use tracing::debug;

use crate::contracts::multicall_handler::IMulticallHandler::CallsFailed;
use crate::contracts::spoke_pool::ISpokePool::{V3FundsDeposited, V3RelayData};
use crate::{ActionsError, Result};

/// Extracts the relay data a relayer needs to fill the deposit in `logs`.
///
/// `logs` are the origin chain receipt's logs; the first `V3FundsDeposited`
/// emitted by `spoke_pool` is used. The same event from any other contract
/// is ignored.
pub fn deposit_from_logs(
    origin_chain_id: u64,
    spoke_pool: Address,
    logs: &[Log],
) -> Result<V3RelayData> {
    let log = logs
        .iter()
        .find(|log| {
            log.address == spoke_pool
                && log.topics().first() == Some(&V3FundsDeposited::SIGNATURE_HASH)
        })
        .ok_or(ActionsError::DepositNotFound)?;

    let deposit = V3FundsDeposited::decode_log_data(&log.data)?;

    debug!(
        deposit_id = deposit.depositId,
        depositor = %deposit.depositor,
        spoke_pool = %log.address,
        event = "deposit_extracted_from_logs"
    );

    Ok(V3RelayData {
        depositor: deposit.depositor,
        recipient: deposit.recipient,
        exclusiveRelayer: deposit.exclusiveRelayer,
        inputToken: deposit.inputToken,
        outputToken: deposit.outputToken,
        inputAmount: deposit.inputAmount,
        outputAmount: deposit.outputAmount,
        originChainId: U256::from(origin_chain_id),
        depositId: deposit.depositId,
        fillDeadline: deposit.fillDeadline,
        exclusivityDeadline: deposit.exclusivityDeadline,
        message: deposit.message,
    })
}

/// The receipt's logs without their RPC metadata
pub fn receipt_logs(receipt: &TransactionReceipt) -> Vec<Log> {
    receipt
        .inner
        .logs()
        .iter()
        .map(|log| log.inner.clone())
        .collect()
}

/// False if the multicall handler reported `CallsFailed` in a fill's logs
pub fn actions_succeeded(fill_logs: &[Log]) -> bool {
    !fill_logs
        .iter()
        .any(|log| log.topics().first() == Some(&CallsFailed::SIGNATURE_HASH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::multicall_handler::IMulticallHandler::Call;
    use alloy_primitives::{address, Address, Bytes};

    fn deposited_event() -> V3FundsDeposited {
        V3FundsDeposited {
            inputToken: Address::repeat_byte(1),
            outputToken: Address::repeat_byte(2),
            inputAmount: U256::from(10_000_000u64),
            outputAmount: U256::from(9_990_000u64),
            destinationChainId: U256::from(8453u64),
            depositId: 1_234,
            quoteTimestamp: 1_700_000_000,
            fillDeadline: 1_700_021_600,
            exclusivityDeadline: 0,
            depositor: Address::repeat_byte(3),
            recipient: Address::repeat_byte(4),
            exclusiveRelayer: Address::ZERO,
            message: Bytes::from_static(&[0xaa]),
        }
    }

    const SPOKE_POOL: Address = address!("0909090909090909090909090909090909090909");

    fn log_of<E: SolEvent>(event: &E) -> Log {
        emitted_by(SPOKE_POOL, event)
    }

    fn emitted_by<E: SolEvent>(address: Address, event: &E) -> Log {
        Log {
            address,
            data: event.encode_log_data(),
        }
    }

    #[test]
    fn test_deposit_from_logs() {
        let unrelated = Log::new_unchecked(Address::ZERO, vec![], Bytes::new());
        let logs = vec![unrelated, log_of(&deposited_event())];

        let relay = deposit_from_logs(42161, SPOKE_POOL, &logs).unwrap();

        assert_eq!(relay.depositId, 1_234);
        assert_eq!(relay.originChainId, U256::from(42161u64));
        assert_eq!(relay.depositor, Address::repeat_byte(3));
        assert_eq!(relay.recipient, Address::repeat_byte(4));
        assert_eq!(relay.outputAmount, U256::from(9_990_000u64));
        assert_eq!(relay.message, Bytes::from_static(&[0xaa]));
    }

    #[test]
    fn test_deposit_missing_from_logs() {
        let result = deposit_from_logs(42161, SPOKE_POOL, &[]);
        assert!(matches!(result, Err(ActionsError::DepositNotFound)));
    }

    #[test]
    fn test_deposit_from_other_contract_is_ignored() {
        let mut spoofed = deposited_event();
        spoofed.depositId = 666;
        spoofed.recipient = Address::repeat_byte(0xee);
        let logs = vec![
            emitted_by(Address::repeat_byte(0xbb), &spoofed),
            log_of(&deposited_event()),
        ];

        let relay = deposit_from_logs(42161, SPOKE_POOL, &logs).unwrap();
        assert_eq!(relay.depositId, 1_234);
        assert_eq!(relay.recipient, Address::repeat_byte(4));

        let result = deposit_from_logs(42161, SPOKE_POOL, &logs[..1]);
        assert!(matches!(result, Err(ActionsError::DepositNotFound)));
    }

    #[test]
    fn test_calls_failed_marks_actions_unsuccessful() {
        let failed = CallsFailed {
            calls: vec![Call {
                target: Address::repeat_byte(1),
                callData: Bytes::new(),
                value: U256::ZERO,
            }],
            fallbackRecipient: Address::repeat_byte(2),
        };

        assert!(actions_succeeded(&[]));
        assert!(!actions_succeeded(&[log_of(&failed)]));
    }
}
