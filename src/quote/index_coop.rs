use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::{index_token_amount, QuoteKind, QuoteProvider, QuoteRequest, QuoteTx};
use crate::de::u256_lenient;
use crate::{ActionsError, Result};

/// Index Coop flash-mint quote endpoint
pub const INDEX_COOP_API: &str = "https://api.indexcoop.com/v2/flashmint/quote";

/// Flash-mint quotes for Index Coop tokens.
///
/// The request amount is in input-token units; it is converted to an index
/// token amount with [`index_token_amount`] before quoting.
#[derive(Debug, Clone)]
pub struct IndexCoopQuoteProvider {
    client: Client,
    api_url: Url,
}

impl IndexCoopQuoteProvider {
    pub fn new(client: Client, api_url: Url) -> Self {
        Self { client, api_url }
    }

    fn quote_url(
        &self,
        request: &QuoteRequest,
        index_token: Address,
        index_amount: U256,
        slippage_percent: f64,
    ) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("chainId", &request.chain_id.to_string())
            .append_pair("account", &request.sender.to_string())
            .append_pair("inputToken", &request.input_token.to_string())
            .append_pair("outputToken", &index_token.to_string())
            .append_pair("indexTokenAmount", &index_amount.to_string())
            .append_pair("slippage", &slippage_percent.to_string())
            .append_pair("isMinting", "true");
        url
    }
}

#[derive(Debug, Deserialize)]
struct FlashMintQuote {
    #[serde(alias = "transaction")]
    tx: Option<FlashMintTx>,
}

#[derive(Debug, Deserialize)]
struct FlashMintTx {
    to: Option<Address>,
    data: Option<Bytes>,
    #[serde(default, deserialize_with = "u256_lenient")]
    value: U256,
}

#[async_trait]
impl QuoteProvider for IndexCoopQuoteProvider {
    async fn quote(&self, request: &QuoteRequest) -> Result<Option<QuoteTx>> {
        let QuoteKind::IndexMint {
            index_token,
            input_decimals,
            slippage_percent,
        } = &request.kind
        else {
            return Err(ActionsError::QuoteUnavailable {
                reason: "Index Coop only serves flash-mint quotes".to_string(),
            });
        };

        let index_amount = index_token_amount(request.amount, *input_decimals);
        let url = self.quote_url(request, *index_token, index_amount, *slippage_percent);

        debug!(
            url = %url,
            input_amount = %request.amount,
            index_amount = %index_amount,
            event = "flash_mint_quote_requested"
        );

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!(event = "flash_mint_quote_not_found");
            return Ok(None);
        }

        let quote: FlashMintQuote = response.error_for_status()?.json().await?;

        // A quote without a target or calldata is as good as no quote.
        let Some(FlashMintTx {
            to: Some(to),
            data: Some(data),
            value,
        }) = quote.tx
        else {
            warn!(event = "flash_mint_quote_incomplete");
            return Ok(None);
        };

        info!(
            flash_mint_contract = %to,
            index_token = %index_token,
            index_amount = %index_amount,
            calldata_length_bytes = data.len(),
            event = "flash_mint_quote_received"
        );

        Ok(Some(QuoteTx { to, data, value }))
    }
}
