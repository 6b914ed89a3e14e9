use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer};
use url::Url;

use super::types::Route;
use crate::de::{u256_lenient, u32_lenient};
use crate::Result;

/// Across app API
///
/// See <https://docs.across.to/reference/api-reference>
pub const ACROSS_API: &str = "https://app.across.to/api";

/// Suggested fees path, relative to the API root
pub const SUGGESTED_FEES_PATH: &str = "suggested-fees";

/// Fill deadline applied when the API does not return one (6 hours)
pub const DEFAULT_FILL_DEADLINE_BUFFER_SECS: u32 = 6 * 60 * 60;

/// Builds the `/suggested-fees` URL for a deposit.
pub fn suggested_fees_url(
    api_url: &Url,
    route: &Route,
    amount: U256,
    recipient: Address,
    depositor: Address,
    message: &Bytes,
) -> Result<Url> {
    let base = api_url.as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}/{SUGGESTED_FEES_PATH}"))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("inputToken", &route.input_token.to_string())
            .append_pair("outputToken", &route.output_token.to_string())
            .append_pair("originChainId", &route.origin_chain_id.to_string())
            .append_pair("destinationChainId", &route.destination_chain_id.to_string())
            .append_pair("amount", &amount.to_string())
            .append_pair("recipient", &recipient.to_string())
            .append_pair("depositor", &depositor.to_string());
        if !message.is_empty() {
            query.append_pair("message", &message.to_string());
        }
    }

    Ok(url)
}

/// Relay fee breakdown entry
#[derive(Debug, Deserialize)]
pub struct FeeDetail {
    #[serde(default, deserialize_with = "u256_lenient")]
    pub total: U256,
}

/// Response of `GET /suggested-fees`
///
/// Older API versions omit `outputAmount` and `fillDeadline`; both are then
/// derived from the relay fee and quote timestamp.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFees {
    #[serde(default, deserialize_with = "optional_u256")]
    pub output_amount: Option<U256>,
    pub total_relay_fee: Option<FeeDetail>,
    pub spoke_pool_address: Address,
    pub destination_spoke_pool_address: Option<Address>,
    #[serde(default)]
    pub exclusive_relayer: Address,
    #[serde(default, deserialize_with = "u32_lenient")]
    pub exclusivity_deadline: u32,
    #[serde(deserialize_with = "u32_lenient")]
    pub timestamp: u32,
    #[serde(default, deserialize_with = "optional_u32")]
    pub fill_deadline: Option<u32>,
    #[serde(default, deserialize_with = "optional_u64")]
    pub expected_fill_time_sec: Option<u64>,
    #[serde(default)]
    pub is_amount_too_low: bool,
}

impl SuggestedFees {
    /// Amount the recipient receives on the destination chain
    pub fn output_amount(&self, input_amount: U256) -> U256 {
        self.output_amount.unwrap_or_else(|| {
            let fee = self
                .total_relay_fee
                .as_ref()
                .map(|fee| fee.total)
                .unwrap_or_default();
            input_amount.saturating_sub(fee)
        })
    }

    pub fn fill_deadline(&self) -> u32 {
        self.fill_deadline
            .unwrap_or_else(|| self.timestamp.saturating_add(DEFAULT_FILL_DEADLINE_BUFFER_SECS))
    }
}

fn optional_u256<'de, D>(deserializer: D) -> std::result::Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "u256_lenient")] U256);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(value)| value))
}

fn optional_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "u32_lenient")] u32);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(value)| value))
}

fn optional_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const RESPONSE: &str = r#"{
        "estimatedFillTimeSec": 4,
        "totalRelayFee": {"pct": "1000000000000000", "total": "10000"},
        "timestamp": "1700000000",
        "isAmountTooLow": false,
        "quoteBlock": "20000000",
        "exclusiveRelayer": "0x0000000000000000000000000000000000000000",
        "exclusivityDeadline": 0,
        "spokePoolAddress": "0xe35e9842fceaCA96570B734083f4a58e8F7C5f2A",
        "destinationSpokePoolAddress": "0x09aea4b2242abC8bb4BB78D537A67a245A7bEC64",
        "expectedFillTimeSec": "4",
        "fillDeadline": "1700021600",
        "outputAmount": "9990000"
    }"#;

    #[test]
    fn test_parse_suggested_fees() {
        let fees: SuggestedFees = serde_json::from_str(RESPONSE).unwrap();

        assert_eq!(fees.output_amount(U256::from(10_000_000u64)), U256::from(9_990_000u64));
        assert_eq!(
            fees.spoke_pool_address,
            address!("e35e9842fceaCA96570B734083f4a58e8F7C5f2A")
        );
        assert_eq!(
            fees.destination_spoke_pool_address,
            Some(address!("09aea4b2242abC8bb4BB78D537A67a245A7bEC64"))
        );
        assert_eq!(fees.timestamp, 1_700_000_000);
        assert_eq!(fees.fill_deadline(), 1_700_021_600);
        assert_eq!(fees.expected_fill_time_sec, Some(4));
    }

    #[test]
    fn test_legacy_response_derives_missing_fields() {
        let json = r#"{
            "totalRelayFee": {"total": "10000"},
            "timestamp": 1700000000,
            "spokePoolAddress": "0xe35e9842fceaCA96570B734083f4a58e8F7C5f2A"
        }"#;
        let fees: SuggestedFees = serde_json::from_str(json).unwrap();

        assert_eq!(fees.output_amount(U256::from(10_000_000u64)), U256::from(9_990_000u64));
        assert_eq!(fees.fill_deadline(), 1_700_000_000 + DEFAULT_FILL_DEADLINE_BUFFER_SECS);
        assert_eq!(fees.exclusive_relayer, Address::ZERO);
        assert!(fees.destination_spoke_pool_address.is_none());
    }

    #[test]
    fn test_suggested_fees_url() {
        let route = Route {
            origin_chain_id: 42161,
            destination_chain_id: 8453,
            input_token: address!("af88d065e77c8cC2239327C5EDb3A432268e5831"),
            output_token: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
        };

        let url = suggested_fees_url(
            &Url::parse(ACROSS_API).unwrap(),
            &route,
            U256::from(10_000_000u64),
            address!("924a9f036260DdD5808007E1AA95f08eD08aA569"),
            Address::ZERO,
            &Bytes::from_static(&[0xab]),
        )
        .unwrap();

        insta::assert_snapshot!(url.as_str(), @"https://app.across.to/api/suggested-fees?inputToken=0xaf88d065e77c8cC2239327C5EDb3A432268e5831&outputToken=0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913&originChainId=42161&destinationChainId=8453&amount=10000000&recipient=0x924a9f036260DdD5808007E1AA95f08eD08aA569&depositor=0x0000000000000000000000000000000000000000&message=0xab");
    }
}
