//! External quote lookups
//!
//! Some destination actions cannot be encoded locally: the transaction comes
//! from a third-party API (an index-token flash mint, a KyberSwap zap) and
//! depends on the amount being spent. Those actions keep their
//! [`QuoteRequest`] and re-run it once the bridged amount is known.

mod index_coop;
mod kyberswap;

pub use index_coop::{IndexCoopQuoteProvider, INDEX_COOP_API};
pub use kyberswap::{KyberZapQuoteProvider, KYBERSWAP_ZAP_API};

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;

use crate::{ActionsError, Result};

/// Share of the scaled amount requested from the index minter, in basis points
///
/// Leaves headroom for price movement between quoting and execution.
pub const INDEX_BUFFER_BPS: u64 = 9_800;

/// Decimals of index tokens
pub const INDEX_TOKEN_DECIMALS: u8 = 18;

/// What kind of quote a request asks for
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteKind {
    /// Flash-mint `index_token` paying with the request's input token
    IndexMint {
        index_token: Address,
        input_decimals: u8,
        /// Slippage tolerance in percent, e.g. `0.1`
        slippage_percent: f64,
    },
    /// Zap the input token into a concentrated-liquidity position
    ZapIn {
        dex: String,
        pool: Address,
        tick_lower: i32,
        tick_upper: i32,
    },
}

/// A quote lookup for spending `amount` of `input_token` on `chain_id`
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub chain_id: u64,
    pub input_token: Address,
    pub amount: U256,
    /// Account that will submit the quoted transaction
    pub sender: Address,
    /// Account that receives whatever the transaction produces
    pub recipient: Address,
    pub kind: QuoteKind,
}

impl QuoteRequest {
    /// Returns the same request for a different amount
    pub fn with_amount(&self, amount: U256) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// A quoted transaction ready to be embedded as an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTx {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// Source of quoted transactions.
///
/// `Ok(None)` means the service answered but had no route for the request.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Option<QuoteTx>>;
}

/// Quote provider for bundles that never need one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQuotes;

#[async_trait]
impl QuoteProvider for NoQuotes {
    async fn quote(&self, _request: &QuoteRequest) -> Result<Option<QuoteTx>> {
        Err(ActionsError::QuoteUnavailable {
            reason: "no quote provider configured".to_string(),
        })
    }
}

/// Runs `request` and treats an empty answer as an error.
pub async fn require_quote<Q>(quotes: &Q, request: &QuoteRequest) -> Result<QuoteTx>
where
    Q: QuoteProvider + ?Sized,
{
    quotes
        .quote(request)
        .await?
        .ok_or_else(|| ActionsError::QuoteUnavailable {
            reason: format!(
                "no route for {} of {} on chain {}",
                request.amount, request.input_token, request.chain_id
            ),
        })
}

/// Converts an input-token amount into the index-token amount to mint.
///
/// Inputs with fewer than 18 decimals are scaled up to 18 and reduced to
/// [`INDEX_BUFFER_BPS`] of the result. 18-decimal inputs pass through.
pub fn index_token_amount(amount: U256, input_decimals: u8) -> U256 {
    if input_decimals >= INDEX_TOKEN_DECIMALS {
        return amount;
    }

    let scale = U256::from(10u64).pow(U256::from(INDEX_TOKEN_DECIMALS - input_decimals));
    amount * scale * U256::from(INDEX_BUFFER_BPS) / U256::from(10_000u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::usdc(U256::from(10_000_000u64), 6, U256::from(9_800_000_000_000_000_000u128))]
    #[case::weth(U256::from(100u64), 18, U256::from(100u64))]
    #[case::zero(U256::ZERO, 6, U256::ZERO)]
    fn test_index_token_amount(#[case] amount: U256, #[case] decimals: u8, #[case] expected: U256) {
        assert_eq!(index_token_amount(amount, decimals), expected);
    }

    #[test]
    fn test_with_amount_keeps_everything_else() {
        let request = QuoteRequest {
            chain_id: 8453,
            input_token: Address::repeat_byte(1),
            amount: U256::from(1u64),
            sender: Address::repeat_byte(2),
            recipient: Address::repeat_byte(3),
            kind: QuoteKind::ZapIn {
                dex: "DEX_SWAPMODEV3".to_string(),
                pool: Address::repeat_byte(4),
                tick_lower: -10,
                tick_upper: 10,
            },
        };

        let updated = request.with_amount(U256::from(2u64));
        assert_eq!(updated.amount, U256::from(2u64));
        assert_eq!(updated.with_amount(U256::from(1u64)), request);
    }

    #[tokio::test]
    async fn test_no_quotes_is_unavailable() {
        let request = QuoteRequest {
            chain_id: 1,
            input_token: Address::ZERO,
            amount: U256::ZERO,
            sender: Address::ZERO,
            recipient: Address::ZERO,
            kind: QuoteKind::IndexMint {
                index_token: Address::ZERO,
                input_decimals: 6,
                slippage_percent: 0.1,
            },
        };

        let result = require_quote(&NoQuotes, &request).await;
        assert!(matches!(result, Err(ActionsError::QuoteUnavailable { .. })));
    }
}
