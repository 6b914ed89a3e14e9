//! Example and simulation configuration
//!
//! [`ExampleConfig`] holds the static route and amount of one example.
//! [`SimulationSettings`] holds the Tenderly credentials and local paths a
//! simulation run needs, read from the environment.

use std::path::PathBuf;

use alloy_primitives::{address, Address, U256};
use alloy_signer_local::PrivateKeySigner;
use bon::Builder;

use crate::across::{Route, ACROSS_API};
use crate::{ActionsError, Result};

/// USDC on Arbitrum
pub const ARBITRUM_USDC: Address = address!("af88d065e77c8cC2239327C5EDb3A432268e5831");
/// USDC on Base
pub const BASE_USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
/// WETH on Arbitrum
pub const ARBITRUM_WETH: Address = address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1");
/// WETH on Base
pub const BASE_WETH: Address = address!("4200000000000000000000000000000000000006");
/// Aave V3 Pool on Base
pub const BASE_AAVE_POOL: Address = address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5");
/// Index Coop icUSD on Base
pub const BASE_ICUSD: Address = address!("F06A59348712a11e7823Ad8BFc45c59f7EAFCc60");

const TEN_USDC: u64 = 10_000_000;
const TENTH_OF_ETHER: u64 = 100_000_000_000_000_000;

/// Route, amount and destination contract of one example.
///
/// `amount` is in input-token units. It is the placeholder the bundle is built
/// with; the bridged output amount replaces it during resolution.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct ExampleConfig {
    /// The destination contract the bundle interacts with, if there is a
    /// single fixed one
    #[builder(default)]
    pub contract_address: Address,
    pub source_chain: u64,
    pub destination_chain: u64,
    pub input_token: Address,
    pub output_token: Address,
    pub amount: U256,
    /// Receives the bridged funds if the destination calls fail. `None` means
    /// the recipient the bundle is built for.
    pub fallback_recipient: Option<Address>,
}

impl ExampleConfig {
    /// Starting point for a new integration: 10 USDC from Arbitrum to Base,
    /// approved to the Base Aave pool.
    pub fn template() -> Self {
        Self::builder()
            .contract_address(BASE_AAVE_POOL)
            .source_chain(42161)
            .destination_chain(8453)
            .input_token(ARBITRUM_USDC)
            .output_token(BASE_USDC)
            .amount(U256::from(TEN_USDC))
            .build()
    }

    /// 10 USDC supplied to Aave on Base
    pub fn aave() -> Self {
        Self::template()
    }

    /// 0.1 WETH minted into Chi stablecoins on Base through `minter`
    pub fn chi_protocol(minter: Address) -> Self {
        Self::builder()
            .contract_address(minter)
            .source_chain(42161)
            .destination_chain(8453)
            .input_token(ARBITRUM_WETH)
            .output_token(BASE_WETH)
            .amount(U256::from(TENTH_OF_ETHER))
            .build()
    }

    /// 10 USDC posted as Morpho Blue collateral on Base
    pub fn morpho() -> Self {
        Self::builder()
            .contract_address(crate::chain::addresses::MORPHO_BLUE_ADDRESS)
            .source_chain(42161)
            .destination_chain(8453)
            .input_token(ARBITRUM_USDC)
            .output_token(BASE_USDC)
            .amount(U256::from(TEN_USDC))
            .build()
    }

    /// 10 USDC flash-minted into icUSD on Base
    pub fn index_coop() -> Self {
        Self::builder()
            .contract_address(BASE_ICUSD)
            .source_chain(42161)
            .destination_chain(8453)
            .input_token(ARBITRUM_USDC)
            .output_token(BASE_USDC)
            .amount(U256::from(TEN_USDC))
            .build()
    }

    /// 0.1 WETH zapped into a SwapMode concentrated-liquidity position on Base
    pub fn swapmode() -> Self {
        Self::builder()
            .source_chain(42161)
            .destination_chain(8453)
            .input_token(ARBITRUM_WETH)
            .output_token(BASE_WETH)
            .amount(U256::from(TENTH_OF_ETHER))
            .build()
    }

    pub fn route(&self) -> Route {
        Route {
            origin_chain_id: self.source_chain,
            destination_chain_id: self.destination_chain,
            input_token: self.input_token,
            output_token: self.output_token,
        }
    }

    /// The fallback recipient for a bundle built for `recipient`
    pub fn fallback_recipient_for(&self, recipient: Address) -> Address {
        self.fallback_recipient.unwrap_or(recipient)
    }
}

/// Default location of the testnet id log
pub const DEFAULT_TESTNET_IDS_PATH: &str = "testnet-ids.json";

/// Settings for a forked-network simulation.
///
/// # Example
///
/// ```rust,no_run
/// use across_actions::SimulationSettings;
///
/// # fn example() -> across_actions::Result<()> {
/// let settings = SimulationSettings::from_env()?;
/// println!("Tenderly project: {}", settings.tenderly_project);
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Debug, Clone)]
pub struct SimulationSettings {
    #[builder(into)]
    pub tenderly_access_key: String,
    #[builder(into)]
    pub tenderly_account: String,
    #[builder(into)]
    pub tenderly_project: String,
    #[builder(into, default = ACROSS_API.to_string())]
    pub across_api_url: String,
    #[builder(into, default = PathBuf::from(DEFAULT_TESTNET_IDS_PATH))]
    pub testnet_ids_path: PathBuf,
    /// Signs the user's transactions; a random key is generated if unset
    pub private_key: Option<PrivateKeySigner>,
}

impl SimulationSettings {
    /// Reads settings from the process environment after loading `.env`.
    ///
    /// Required: `TENDERLY_ACCESS_KEY`, `TENDERLY_ACCOUNT`,
    /// `TENDERLY_PROJECT`. Optional: `ACROSS_API_URL`, `TESTNET_IDS_PATH`,
    /// `PRIVATE_KEY`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let private_key = optional_env("PRIVATE_KEY")
            .map(|key| {
                key.parse::<PrivateKeySigner>().map_err(|e| {
                    ActionsError::InvalidConfig(format!("PRIVATE_KEY is not a valid key: {e}"))
                })
            })
            .transpose()?;

        Ok(Self::builder()
            .tenderly_access_key(required_env("TENDERLY_ACCESS_KEY")?)
            .tenderly_account(required_env("TENDERLY_ACCOUNT")?)
            .tenderly_project(required_env("TENDERLY_PROJECT")?)
            .across_api_url(
                optional_env("ACROSS_API_URL").unwrap_or_else(|| ACROSS_API.to_string()),
            )
            .testnet_ids_path(
                optional_env("TESTNET_IDS_PATH")
                    .unwrap_or_else(|| DEFAULT_TESTNET_IDS_PATH.to_string()),
            )
            .maybe_private_key(private_key)
            .build())
    }

    /// The configured signer, or a fresh random one
    pub fn user_signer(&self) -> PrivateKeySigner {
        self.private_key
            .clone()
            .unwrap_or_else(PrivateKeySigner::random)
    }
}

fn required_env(name: &str) -> Result<String> {
    optional_env(name).ok_or_else(|| ActionsError::MissingEnv(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::template(ExampleConfig::template())]
    #[case::aave(ExampleConfig::aave())]
    #[case::morpho(ExampleConfig::morpho())]
    #[case::index_coop(ExampleConfig::index_coop())]
    #[case::swapmode(ExampleConfig::swapmode())]
    #[case::chi(ExampleConfig::chi_protocol(Address::repeat_byte(0xc1)))]
    fn test_presets_use_eligible_chains(#[case] config: ExampleConfig) {
        assert!(crate::chain::eligible_chain(config.source_chain).is_ok());
        assert!(crate::chain::eligible_chain(config.destination_chain).is_ok());
        assert!(!config.amount.is_zero());
        assert!(config.fallback_recipient.is_none());
    }

    #[test]
    fn test_template_amount() {
        let config = ExampleConfig::template();
        assert_eq!(config.amount, U256::from(10_000_000u64));
        assert_eq!(config.output_token, BASE_USDC);
    }

    #[test]
    fn test_route_follows_config() {
        let route = ExampleConfig::chi_protocol(Address::repeat_byte(0xc1)).route();
        assert_eq!(route.origin_chain_id, 42161);
        assert_eq!(route.destination_chain_id, 8453);
        assert_eq!(route.input_token, ARBITRUM_WETH);
        assert_eq!(route.output_token, BASE_WETH);
    }

    #[test]
    fn test_fallback_recipient_defaults_to_recipient() {
        let recipient = Address::repeat_byte(1);
        let config = ExampleConfig::template();
        assert_eq!(config.fallback_recipient_for(recipient), recipient);

        let config = ExampleConfig {
            fallback_recipient: Some(Address::repeat_byte(2)),
            ..config
        };
        assert_eq!(config.fallback_recipient_for(recipient), Address::repeat_byte(2));
    }

    #[test]
    fn test_settings_builder_defaults() {
        let settings = SimulationSettings::builder()
            .tenderly_access_key("key")
            .tenderly_account("account")
            .tenderly_project("project")
            .build();

        assert_eq!(settings.across_api_url, ACROSS_API);
        assert_eq!(settings.testnet_ids_path, PathBuf::from(DEFAULT_TESTNET_IDS_PATH));
        assert!(settings.private_key.is_none());
    }
}
