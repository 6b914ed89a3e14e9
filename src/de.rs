//! Lenient deserializers for third-party API responses
//!
//! Quote services disagree on whether amounts and timestamps are JSON numbers
//! or decimal strings, so these accept both.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

pub(crate) fn u256_lenient<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(U256::from(n)),
        NumberOrString::String(s) if s.is_empty() => Ok(U256::ZERO),
        NumberOrString::String(s) => s.parse::<U256>().map_err(de::Error::custom),
    }
}

pub(crate) fn u32_lenient<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s.parse::<u64>().map_err(de::Error::custom)?,
    };
    u32::try_from(value).map_err(de::Error::custom)
}

/// Seconds since the Unix epoch, or zero if the system clock is before it
pub(crate) fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
