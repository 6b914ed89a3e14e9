use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::{QuoteKind, QuoteProvider, QuoteRequest, QuoteTx};
use crate::de::{u256_lenient, unix_timestamp};
use crate::{ActionsError, Result};

/// KyberSwap zap-in route endpoint on Base
pub const KYBERSWAP_ZAP_API: &str = "https://zap-api.kyberswap.com/base/api/v1/in/route";

const CLIENT_ID: &str = "across-actions";
const DEFAULT_SLIPPAGE_BPS: u32 = 50;
const ROUTE_TTL_SECS: u64 = 1_200;

/// Zap quotes from the KyberSwap zap API.
///
/// A quote takes two calls: `GET {route_url}` finds a route, then
/// `POST {route_url}/build` turns it into router calldata.
#[derive(Debug, Clone)]
pub struct KyberZapQuoteProvider {
    client: Client,
    route_url: Url,
    slippage_bps: u32,
}

impl KyberZapQuoteProvider {
    pub fn new(client: Client, route_url: Url) -> Self {
        Self {
            client,
            route_url,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    fn build_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/build",
            self.route_url.as_str().trim_end_matches('/')
        ))?)
    }
}

#[derive(Debug, Deserialize)]
struct ZapEnvelope<T> {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZapRoute {
    route: String,
    router_address: Address,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ZapBuildRequest<'a> {
    sender: Address,
    recipient: Address,
    route: &'a str,
    deadline: u64,
    source: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZapBuild {
    call_data: Bytes,
    router_address: Address,
    #[serde(default, deserialize_with = "u256_lenient")]
    value: U256,
}

#[async_trait]
impl QuoteProvider for KyberZapQuoteProvider {
    async fn quote(&self, request: &QuoteRequest) -> Result<Option<QuoteTx>> {
        let QuoteKind::ZapIn {
            dex,
            pool,
            tick_lower,
            tick_upper,
        } = &request.kind
        else {
            return Err(ActionsError::QuoteUnavailable {
                reason: "KyberSwap only serves zap-in quotes".to_string(),
            });
        };

        debug!(
            pool = %pool,
            amount = %request.amount,
            tick_lower = tick_lower,
            tick_upper = tick_upper,
            event = "zap_route_requested"
        );

        let mut url = self.route_url.clone();
        url.query_pairs_mut()
            .append_pair("dex", dex)
            .append_pair("pool.id", &pool.to_string())
            .append_pair("position.tickLower", &tick_lower.to_string())
            .append_pair("position.tickUpper", &tick_upper.to_string())
            .append_pair("tokensIn", &request.input_token.to_string())
            .append_pair("amountsIn", &request.amount.to_string())
            .append_pair("slippage", &self.slippage_bps.to_string());

        let route: ZapEnvelope<ZapRoute> = self
            .client
            .get(url)
            .header("x-client-id", CLIENT_ID)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(route) = route.data else {
            warn!(
                code = route.code,
                message = %route.message,
                event = "zap_route_unavailable"
            );
            return Ok(None);
        };

        let body = ZapBuildRequest {
            sender: request.sender,
            recipient: request.recipient,
            route: &route.route,
            deadline: unix_timestamp() + ROUTE_TTL_SECS,
            source: CLIENT_ID,
        };

        let built: ZapEnvelope<ZapBuild> = self
            .client
            .post(self.build_url()?)
            .header("x-client-id", CLIENT_ID)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(built) = built.data else {
            warn!(
                code = built.code,
                message = %built.message,
                event = "zap_build_unavailable"
            );
            return Ok(None);
        };

        if built.router_address != route.router_address {
            debug!(
                route_router = %route.router_address,
                build_router = %built.router_address,
                event = "zap_router_changed"
            );
        }

        info!(
            router = %built.router_address,
            calldata_length_bytes = built.call_data.len(),
            value = %built.value,
            event = "zap_quote_built"
        );

        Ok(Some(QuoteTx {
            to: built.router_address,
            data: built.call_data,
            value: built.value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_appends_build() {
        let provider =
            KyberZapQuoteProvider::new(Client::new(), Url::parse(KYBERSWAP_ZAP_API).unwrap());
        insta::assert_snapshot!(
            provider.build_url().unwrap().as_str(),
            @"https://zap-api.kyberswap.com/base/api/v1/in/route/build"
        );
    }

    #[test]
    fn test_parse_build_response() {
        let json = r#"{
            "code": 0,
            "message": "OK",
            "data": {
                "callData": "0xdeadbeef",
                "routerAddress": "0x0e97c887b61ccd952a53578b04763e7134429e05",
                "value": "0"
            }
        }"#;

        let parsed: ZapEnvelope<ZapBuild> = serde_json::from_str(json).unwrap();
        let data = parsed.data.unwrap();
        assert_eq!(data.call_data.to_vec(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(data.value, U256::ZERO);
    }

    #[test]
    fn test_parse_error_envelope() {
        let json = r#"{"code": 4008, "message": "route not found"}"#;
        let parsed: ZapEnvelope<ZapRoute> = serde_json::from_str(json).unwrap();
        assert!(parsed.data.is_none());
        assert_eq!(parsed.code, 4008);
    }
}
