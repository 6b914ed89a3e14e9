use alloy_primitives::{Address, Bytes, Log, TxHash, U256};
use bon::Builder;

use crate::message::ResolvedMessage;

/// Token pair and chains a deposit bridges between
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    pub input_token: Address,
    pub output_token: Address,
}

/// Everything needed to submit a `depositV3`, as quoted by the Across API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDeposit {
    pub depositor: Address,
    /// The multicall handler when the deposit carries a message
    pub recipient: Address,
    pub input_token: Address,
    pub output_token: Address,
    pub input_amount: U256,
    pub output_amount: U256,
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    pub spoke_pool: Address,
    pub destination_spoke_pool: Address,
    pub exclusive_relayer: Address,
    pub exclusivity_deadline: u32,
    pub quote_timestamp: u32,
    pub fill_deadline: u32,
    /// Encoded multicall handler instructions, empty for plain transfers
    pub message: Bytes,
}

impl QuoteDeposit {
    /// Returns a copy any relayer can fill immediately.
    ///
    /// A forked network has no exclusive relayer to honor the quote, so the
    /// replayed fill would revert until the exclusivity window closed.
    pub fn without_exclusivity(&self) -> Self {
        Self {
            exclusive_relayer: Address::ZERO,
            exclusivity_deadline: 0,
            ..self.clone()
        }
    }
}

/// A quoted deposit together with the message encoded into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeQuote {
    pub deposit: QuoteDeposit,
    pub message: ResolvedMessage,
    pub estimated_fill_time_secs: Option<u64>,
}

/// Outcome of a step so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Pending,
    SimulationSuccess,
    TxSuccess,
    Error(String),
}

/// Step of a deposit's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStep {
    Approve,
    Deposit,
    Fill,
}

impl std::fmt::Display for ExecutionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Deposit => write!(f, "deposit"),
            Self::Fill => write!(f, "fill"),
        }
    }
}

/// Progress reported while executing a quote.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionProgress {
    Approve {
        status: ExecutionStatus,
        tx_hash: Option<TxHash>,
    },
    /// On `TxSuccess`, `logs` holds the deposit receipt's logs
    Deposit {
        status: ExecutionStatus,
        tx_hash: Option<TxHash>,
        logs: Vec<Log>,
    },
    /// On `TxSuccess`, `action_success` says whether the destination calls ran
    Fill {
        status: ExecutionStatus,
        tx_hash: Option<TxHash>,
        action_success: Option<bool>,
    },
}

impl ExecutionProgress {
    pub fn step(&self) -> ExecutionStep {
        match self {
            Self::Approve { .. } => ExecutionStep::Approve,
            Self::Deposit { .. } => ExecutionStep::Deposit,
            Self::Fill { .. } => ExecutionStep::Fill,
        }
    }

    pub fn status(&self) -> &ExecutionStatus {
        match self {
            Self::Approve { status, .. }
            | Self::Deposit { status, .. }
            | Self::Fill { status, .. } => status,
        }
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Approve { tx_hash, .. }
            | Self::Deposit { tx_hash, .. }
            | Self::Fill { tx_hash, .. } => *tx_hash,
        }
    }

    pub(crate) fn approve(status: ExecutionStatus, tx_hash: Option<TxHash>) -> Self {
        Self::Approve { status, tx_hash }
    }

    pub(crate) fn deposit(status: ExecutionStatus, tx_hash: Option<TxHash>) -> Self {
        Self::Deposit {
            status,
            tx_hash,
            logs: Vec::new(),
        }
    }

    pub(crate) fn fill(status: ExecutionStatus, tx_hash: Option<TxHash>) -> Self {
        Self::Fill {
            status,
            tx_hash,
            action_success: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit() -> QuoteDeposit {
        QuoteDeposit {
            depositor: Address::repeat_byte(1),
            recipient: Address::repeat_byte(2),
            input_token: Address::repeat_byte(3),
            output_token: Address::repeat_byte(4),
            input_amount: U256::from(10_000_000u64),
            output_amount: U256::from(9_990_000u64),
            origin_chain_id: 42161,
            destination_chain_id: 8453,
            spoke_pool: Address::repeat_byte(5),
            destination_spoke_pool: Address::repeat_byte(6),
            exclusive_relayer: Address::repeat_byte(7),
            exclusivity_deadline: 1_700_000_300,
            quote_timestamp: 1_700_000_000,
            fill_deadline: 1_700_021_600,
            message: Bytes::from_static(&[1, 2, 3]),
        }
    }

    #[test]
    fn test_without_exclusivity_clears_relayer_only() {
        let original = deposit();
        let open = original.without_exclusivity();

        assert_eq!(open.exclusive_relayer, Address::ZERO);
        assert_eq!(open.exclusivity_deadline, 0);
        assert_eq!(
            QuoteDeposit {
                exclusive_relayer: original.exclusive_relayer,
                exclusivity_deadline: original.exclusivity_deadline,
                ..open
            },
            original
        );
    }

    #[test]
    fn test_progress_accessors() {
        let progress = ExecutionProgress::fill(ExecutionStatus::Pending, None);
        assert_eq!(progress.step(), ExecutionStep::Fill);
        assert_eq!(progress.status(), &ExecutionStatus::Pending);
        assert_eq!(progress.tx_hash(), None);
        assert_eq!(progress.step().to_string(), "fill");
    }

    #[test]
    fn test_route_builder() {
        let route = Route::builder()
            .origin_chain_id(42161)
            .destination_chain_id(8453)
            .input_token(Address::repeat_byte(1))
            .output_token(Address::repeat_byte(2))
            .build();

        assert_eq!(route.origin_chain_id, 42161);
        assert_eq!(route.output_token, Address::repeat_byte(2));
    }
}
