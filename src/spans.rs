//! OpenTelemetry span helpers for bridging and simulation
//!
//! Span names are static (`across_actions.*`) and carry structured attributes,
//! so traces stay queryable regardless of which example produced them. The
//! library attaches these spans to futures with `tracing::Instrument`.
//!
//! # Example
//!
//! ```rust,no_run
//! use across_actions::spans;
//! use alloy_primitives::U256;
//! use tracing::Instrument;
//!
//! # async fn example() {
//! let span = spans::get_quote(42161, 8453, &U256::from(10_000_000u64));
//! async {
//!     // Custom quoting logic here
//! }
//! .instrument(span)
//! .await;
//! # }
//! ```

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;

/// Create span for building an example's action bundle.
///
/// Parent: Top-level simulation span
/// Children: Quote provider requests, nonce reads
#[inline]
pub fn create_message(example: &str, recipient: &Address) -> Span {
    tracing::info_span!(
        "across_actions.create_message",
        example = example,
        recipient = %recipient,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for resolving action updates with the bridged amount.
///
/// Parent: across_actions.get_quote
/// Children: Quote provider requests for `Quote` updates
#[inline]
pub fn resolve_message(action_count: usize, output_amount: &U256) -> Span {
    tracing::info_span!(
        "across_actions.resolve_message",
        action_count = action_count,
        output_amount = %output_amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for requesting suggested fees from the Across API.
///
/// Parent: Top-level simulation span
/// Children: across_actions.resolve_message
#[inline]
pub fn get_quote(origin_chain_id: u64, destination_chain_id: u64, input_amount: &U256) -> Span {
    tracing::info_span!(
        "across_actions.get_quote",
        origin_chain_id = origin_chain_id,
        destination_chain_id = destination_chain_id,
        input_amount = %input_amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for approving and submitting a deposit, then waiting for its fill.
///
/// Parent: Top-level simulation span
/// Children: across_actions.send_transaction, across_actions.wait_for_fill
#[inline]
pub fn execute_quote(depositor: &Address, spoke_pool: &Address, input_amount: &U256) -> Span {
    tracing::info_span!(
        "across_actions.execute_quote",
        depositor = %depositor,
        spoke_pool = %spoke_pool,
        input_amount = %input_amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for simulating and sending a single transaction.
///
/// Parent: across_actions.execute_quote or across_actions.fill_relay
/// Children: Provider RPC calls
#[inline]
pub fn send_transaction(step: &str, chain_id: u64) -> Span {
    tracing::debug_span!(
        "across_actions.send_transaction",
        step = step,
        chain_id = chain_id,
        tx_hash = tracing::field::Empty,
    )
}

/// Create span for polling the destination spoke pool for a fill.
///
/// Parent: across_actions.execute_quote
/// Children: Provider `eth_getLogs` calls
#[inline]
pub fn wait_for_fill(
    origin_chain_id: u64,
    deposit_id: u32,
    max_attempts: u32,
    poll_interval_secs: u64,
) -> Span {
    tracing::info_span!(
        "across_actions.wait_for_fill",
        origin_chain_id = origin_chain_id,
        deposit_id = deposit_id,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for creating a Tenderly virtual testnet.
///
/// Parent: Top-level simulation span
/// Children: HTTP client request spans
#[inline]
pub fn provision_testnet(chain_id: u64, tenderly_name: &str) -> Span {
    tracing::info_span!(
        "across_actions.provision_testnet",
        chain_id = chain_id,
        tenderly_name = tenderly_name,
        testnet_id = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for replaying a deposit's fill as the relayer.
///
/// Parent: across_actions.execute_quote (via the progress observer)
/// Children: across_actions.send_transaction
#[inline]
pub fn fill_relay(deposit_id: u32, relayer: &Address, spoke_pool: &Address) -> Span {
    tracing::info_span!(
        "across_actions.fill_relay",
        deposit_id = deposit_id,
        relayer = %relayer,
        spoke_pool = %spoke_pool,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for a full forked-network simulation of one example.
///
/// Parent: None
/// Children: Every other `across_actions.*` span
#[inline]
pub fn simulate(example: &str, origin_chain_id: u64, destination_chain_id: u64) -> Span {
    tracing::info_span!(
        "across_actions.simulate",
        example = example,
        origin_chain_id = origin_chain_id,
        destination_chain_id = destination_chain_id,
        outcome = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Record the hash of a sent transaction on the current span.
pub fn record_tx_hash(tx_hash: &TxHash) {
    tracing::Span::current().record("tx_hash", tracing::field::display(tx_hash));
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    current_span.record(
        "error.type",
        error.to_string().split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", error.to_string());
    current_span.record("otel.status_code", "ERROR");
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use across_actions::spans;
///
/// # fn example() {
/// let span = tracing::info_span!("across_actions.operation");
/// let _guard = span.enter();
///
/// if let Err(e) = some_operation() {
///     spans::record_error_with_context(
///         "TransactionFailed",
///         &format!("Failed to submit deposit: {}", e),
///         Some("Simulation reverted"),
///     );
/// }
/// # }
/// # fn some_operation() -> Result<(), String> { Ok(()) }
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
