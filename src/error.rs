use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionsError {
    #[error("Chain not supported: {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    #[error("No RPC endpoint configured for chain {chain_id}")]
    MissingRpcUrl { chain_id: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid signature format: expected 132 characters, got {length}")]
    InvalidSignatureFormat { length: usize },

    #[error("Quote unavailable: {reason}")]
    QuoteUnavailable { reason: String },

    #[error("Update of action {index} failed: {reason}")]
    UpdateFailed { index: usize, reason: String },

    #[error("Virtual testnet provisioning failed: {reason}")]
    Provisioning { reason: String },

    #[error("Deposit event not found in transaction logs")]
    DepositNotFound,

    #[error("Timed out waiting for fill of deposit {deposit_id}")]
    FillTimeout { deposit_id: u32 },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Contract call failed: {0}")]
    Contract(#[from] alloy_contract::Error),

    #[error("Pending transaction error: {0}")]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),

    #[error("Signer error: {0}")]
    Signer(#[from] alloy_signer::Error),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Dynamic ABI error: {0}")]
    DynAbi(#[from] alloy_dyn_abi::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ActionsError>;
