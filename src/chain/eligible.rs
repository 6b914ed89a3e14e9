//! Eligible chain configuration trait
//!
//! The examples only run against a fixed set of networks. This module maps
//! each of them to the metadata the simulation needs: the Tenderly network
//! slug, a default RPC endpoint, the Across multicall handler and (where
//! deployed) Morpho Blue.

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use url::Url;

use super::addresses::{
    ARBITRUM_RPC_URL, BASE_RPC_URL, BASE_SEPOLIA_RPC_URL, ETHEREUM_RPC_URL,
    LINEA_MULTICALL_HANDLER_ADDRESS, LINEA_RPC_URL, MORPHO_BLUE_ADDRESS,
    MULTICALL_HANDLER_ADDRESS, POLYGON_RPC_URL, SEPOLIA_RPC_URL,
};
use crate::{ActionsError, Result};

/// Prefix of the environment variables overriding a chain's RPC endpoint,
/// e.g. `RPC_URL_8453`.
pub const RPC_URL_ENV_PREFIX: &str = "RPC_URL_";

/// Chain metadata for the networks the examples can bridge between.
///
/// Implemented on `alloy_chains::NamedChain`.
///
/// # Example
///
/// ```rust
/// use across_actions::EligibleChain;
/// use alloy_chains::NamedChain;
///
/// assert!(NamedChain::Base.is_eligible());
/// assert_eq!(NamedChain::Base.tenderly_name().unwrap(), "base");
/// ```
pub trait EligibleChain {
    /// Returns true if the examples support this chain
    fn is_eligible(&self) -> bool;

    /// The network slug Tenderly uses in dashboard URLs
    fn tenderly_name(&self) -> Result<&'static str>;

    /// The public RPC endpoint used when no override is configured
    fn default_rpc_url(&self) -> Result<&'static str>;

    /// The Across `MulticallHandler` that executes bridged actions
    fn multicall_handler_address(&self) -> Result<Address>;

    /// The Morpho Blue singleton, used as the EIP-712 verifying contract
    fn morpho_address(&self) -> Result<Address>;
}

impl EligibleChain for NamedChain {
    fn is_eligible(&self) -> bool {
        matches!(
            self,
            Self::Arbitrum
                | Self::Base
                | Self::Mainnet
                | Self::Polygon
                | Self::Linea
                | Self::Sepolia
                | Self::BaseSepolia
        )
    }

    fn tenderly_name(&self) -> Result<&'static str> {
        Ok(match self {
            Self::Arbitrum => "arbitrum",
            Self::Base => "base",
            Self::Mainnet => "mainnet",
            Self::Polygon => "polygon",
            Self::Linea => "linea",
            Self::Sepolia => "sepolia",
            Self::BaseSepolia => "baseSepolia",
            _ => return Err(unsupported(self)),
        })
    }

    fn default_rpc_url(&self) -> Result<&'static str> {
        Ok(match self {
            Self::Arbitrum => ARBITRUM_RPC_URL,
            Self::Base => BASE_RPC_URL,
            Self::Mainnet => ETHEREUM_RPC_URL,
            Self::Polygon => POLYGON_RPC_URL,
            Self::Linea => LINEA_RPC_URL,
            Self::Sepolia => SEPOLIA_RPC_URL,
            Self::BaseSepolia => BASE_SEPOLIA_RPC_URL,
            _ => return Err(unsupported(self)),
        })
    }

    fn multicall_handler_address(&self) -> Result<Address> {
        if !self.is_eligible() {
            return Err(unsupported(self));
        }

        Ok(match self {
            Self::Linea => LINEA_MULTICALL_HANDLER_ADDRESS,
            _ => MULTICALL_HANDLER_ADDRESS,
        })
    }

    fn morpho_address(&self) -> Result<Address> {
        match self {
            Self::Mainnet | Self::Base => Ok(MORPHO_BLUE_ADDRESS),
            _ => Err(unsupported(self)),
        }
    }
}

fn unsupported(chain: &NamedChain) -> ActionsError {
    ActionsError::UnsupportedChain {
        chain_id: u64::from(*chain),
    }
}

/// Looks up an eligible chain by numeric id.
///
/// Unknown ids and chains outside the eligible set are a configuration error.
pub fn eligible_chain(chain_id: u64) -> Result<NamedChain> {
    NamedChain::try_from(chain_id)
        .ok()
        .filter(EligibleChain::is_eligible)
        .ok_or(ActionsError::UnsupportedChain { chain_id })
}

/// Resolves the RPC endpoint for a chain id.
///
/// `RPC_URL_<chain id>` takes precedence over the chain's default endpoint. An
/// override that is set but empty is reported as a missing endpoint.
pub fn rpc_url(chain_id: u64) -> Result<Url> {
    let chain = eligible_chain(chain_id)?;

    let raw = match std::env::var(format!("{RPC_URL_ENV_PREFIX}{chain_id}")) {
        Ok(value) if value.trim().is_empty() => {
            return Err(ActionsError::MissingRpcUrl { chain_id });
        }
        Ok(value) => value,
        Err(_) => chain.default_rpc_url()?.to_string(),
    };

    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(42161, NamedChain::Arbitrum, "arbitrum")]
    #[case(8453, NamedChain::Base, "base")]
    #[case(1, NamedChain::Mainnet, "mainnet")]
    #[case(137, NamedChain::Polygon, "polygon")]
    #[case(59144, NamedChain::Linea, "linea")]
    #[case(11155111, NamedChain::Sepolia, "sepolia")]
    #[case(84532, NamedChain::BaseSepolia, "baseSepolia")]
    fn test_eligible_chain_lookup(
        #[case] chain_id: u64,
        #[case] expected: NamedChain,
        #[case] tenderly_name: &str,
    ) {
        let chain = eligible_chain(chain_id).unwrap();
        assert_eq!(chain, expected);
        assert_eq!(chain.tenderly_name().unwrap(), tenderly_name);
        assert!(chain.default_rpc_url().is_ok());
        assert!(chain.multicall_handler_address().is_ok());
    }

    #[test]
    fn test_unknown_chain_is_rejected() {
        let result = eligible_chain(10);
        assert!(matches!(
            result,
            Err(ActionsError::UnsupportedChain { chain_id: 10 })
        ));

        let result = eligible_chain(999_999_999);
        assert!(matches!(
            result,
            Err(ActionsError::UnsupportedChain {
                chain_id: 999_999_999
            })
        ));
    }

    #[test]
    fn test_linea_uses_its_own_multicall_handler() {
        assert_eq!(
            NamedChain::Linea.multicall_handler_address().unwrap(),
            LINEA_MULTICALL_HANDLER_ADDRESS
        );
        assert_eq!(
            NamedChain::Base.multicall_handler_address().unwrap(),
            MULTICALL_HANDLER_ADDRESS
        );
    }

    #[test]
    fn test_morpho_only_on_supported_deployments() {
        assert_eq!(
            NamedChain::Base.morpho_address().unwrap(),
            MORPHO_BLUE_ADDRESS
        );
        assert!(matches!(
            NamedChain::Polygon.morpho_address(),
            Err(ActionsError::UnsupportedChain { chain_id: 137 })
        ));
    }

    #[test]
    fn test_rpc_url_default() {
        let url = rpc_url(42161).unwrap();
        insta::assert_snapshot!(url.as_str(), @"https://arb1.arbitrum.io/rpc");
    }
}
