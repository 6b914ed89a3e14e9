//! Across V3 bridge client
//!
//! Quotes deposits through the Across app API, resolves the destination
//! message for the quoted output amount, submits `depositV3` on the origin
//! spoke pool and observes the relayer's fill on the destination.

mod api;
mod client;
mod logs;
mod polling;
mod types;

pub use api::{
    suggested_fees_url, SuggestedFees, ACROSS_API, DEFAULT_FILL_DEADLINE_BUFFER_SECS,
    SUGGESTED_FEES_PATH,
};
pub use client::AcrossClient;
pub use logs::{actions_succeeded, deposit_from_logs, receipt_logs};
pub use polling::PollingConfig;
pub use types::{
    BridgeQuote, ExecutionProgress, ExecutionStatus, ExecutionStep, QuoteDeposit, Route,
};
