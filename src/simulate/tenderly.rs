// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tenderly virtual testnets
//!
//! Virtual testnets are forks of a live chain with an admin RPC that can set
//! balances directly, which is what lets a simulation fund wallets and replay
//! the relayer's fill without real assets.

use std::borrow::Cow;
use std::sync::Arc;

use alloy_network::{Ethereum, EthereumWallet};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, Instrument};
use url::Url;

use super::testnet_ids::TestnetIdLog;
use crate::across::{AcrossClient, PollingConfig};
use crate::chain::{eligible_chain, EligibleChain};
use crate::config::SimulationSettings;
use crate::contracts::erc20::Erc20Contract;
use crate::contracts::spoke_pool::{ISpokePool::V3RelayData, SpokePoolContract};
use crate::de::unix_timestamp;
use crate::provider::{http_client, send_transaction, simulate_and_send};
use crate::quote::QuoteProvider;
use crate::traits::{ForkWallet, SimulationEnvironment};
use crate::{spans, ActionsError, Result};

/// Tenderly REST API root
pub const TENDERLY_API: &str = "https://api.tenderly.co/api/v1";

/// Tenderly dashboard root, used for transaction links
pub const TENDERLY_DASHBOARD: &str = "https://dashboard.tenderly.co";

const ADMIN_RPC_NAME: &str = "Admin RPC";

/// A provisioned virtual testnet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualTestnet {
    pub id: String,
    pub chain_id: u64,
    /// Admin RPC endpoint, which also accepts `tenderly_*` methods
    pub rpc_url: Url,
    pub account: String,
    pub project: String,
    pub tenderly_name: &'static str,
}

/// Dashboard link to a transaction on a virtual testnet
pub fn tenderly_tx_url(testnet: &VirtualTestnet, tx_hash: &TxHash) -> String {
    format!(
        "{TENDERLY_DASHBOARD}/{}/{}/testnet/{}/tx/{}/{tx_hash}",
        testnet.account, testnet.project, testnet.id, testnet.tenderly_name
    )
}

#[derive(Debug, Serialize)]
struct CreateVirtualTestnet {
    slug: String,
    display_name: String,
    fork_config: ForkConfig,
    virtual_network_config: VirtualNetworkConfig,
    sync_state_config: EnabledFlag,
    explorer_page_config: EnabledFlag,
}

#[derive(Debug, Serialize)]
struct ForkConfig {
    network_id: u64,
    block_number: &'static str,
}

#[derive(Debug, Serialize)]
struct VirtualNetworkConfig {
    chain_config: ChainConfig,
}

#[derive(Debug, Serialize)]
struct ChainConfig {
    chain_id: u64,
}

#[derive(Debug, Serialize)]
struct EnabledFlag {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct CreatedVirtualTestnet {
    id: String,
    #[serde(default)]
    rpcs: Vec<RpcEndpoint>,
}

#[derive(Debug, Deserialize)]
struct RpcEndpoint {
    name: String,
    url: Url,
}

impl CreatedVirtualTestnet {
    fn admin_rpc(&self) -> Option<&Url> {
        self.rpcs
            .iter()
            .find(|rpc| rpc.name == ADMIN_RPC_NAME)
            .map(|rpc| &rpc.url)
    }
}

/// Client for Tenderly's virtual testnet API
#[derive(Debug, Clone)]
pub struct TenderlyClient {
    http: Client,
    access_key: String,
    account: String,
    project: String,
}

impl TenderlyClient {
    pub fn new(
        http: Client,
        access_key: impl Into<String>,
        account: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            http,
            access_key: access_key.into(),
            account: account.into(),
            project: project.into(),
        }
    }

    fn vnets_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{TENDERLY_API}/account/{}/project/{}/vnets",
            self.account, self.project
        ))?)
    }

    /// Forks `chain_id` at its latest block.
    ///
    /// The fork keeps the chain id, so contract addresses and EIP-712
    /// domains are the same as on the live chain.
    pub async fn create_virtual_testnet(&self, chain_id: u64) -> Result<VirtualTestnet> {
        let tenderly_name = eligible_chain(chain_id)?.tenderly_name()?;
        let span = spans::provision_testnet(chain_id, tenderly_name);

        async move {
            let slug = format!("across-{tenderly_name}-{}", unix_timestamp());
            let body = CreateVirtualTestnet {
                display_name: slug.clone(),
                slug,
                fork_config: ForkConfig {
                    network_id: chain_id,
                    block_number: "latest",
                },
                virtual_network_config: VirtualNetworkConfig {
                    chain_config: ChainConfig { chain_id },
                },
                sync_state_config: EnabledFlag { enabled: false },
                explorer_page_config: EnabledFlag { enabled: false },
            };

            debug!(chain_id = chain_id, slug = %body.slug, event = "virtual_testnet_requested");

            let response = self
                .http
                .post(self.vnets_url()?)
                .header("X-Access-Key", &self.access_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let reason = format!(
                    "Tenderly returned {status}: {}",
                    response.text().await.unwrap_or_default()
                );
                spans::record_error_with_context("Provisioning", &reason, None);
                error!(chain_id = chain_id, reason = %reason, event = "virtual_testnet_failed");
                return Err(ActionsError::Provisioning { reason });
            }

            let created: CreatedVirtualTestnet = response.json().await?;
            let rpc_url = created
                .admin_rpc()
                .cloned()
                .ok_or_else(|| ActionsError::Provisioning {
                    reason: format!("virtual testnet {} has no admin RPC", created.id),
                })?;

            tracing::Span::current().record("testnet_id", created.id.as_str());
            info!(
                chain_id = chain_id,
                testnet_id = %created.id,
                event = "virtual_testnet_created"
            );

            Ok(VirtualTestnet {
                id: created.id,
                chain_id,
                rpc_url,
                account: self.account.clone(),
                project: self.project.clone(),
                tenderly_name,
            })
        }
        .instrument(span)
        .await
    }
}

/// A wallet on a virtual testnet, signing locally and funded through the
/// admin RPC
#[derive(Clone)]
pub struct TenderlyWallet {
    address: Address,
    provider: DynProvider<Ethereum>,
    chain_id: u64,
}

impl TenderlyWallet {
    pub fn connect(testnet: &VirtualTestnet, signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(testnet.rpc_url.clone())
            .erased();

        debug!(
            address = %address,
            testnet_id = %testnet.id,
            event = "fork_wallet_connected"
        );

        Self {
            address,
            provider,
            chain_id: testnet.chain_id,
        }
    }

    /// Provider that signs with this wallet
    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }
}

#[async_trait]
impl ForkWallet for TenderlyWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn set_balance(&self, amount: U256) -> Result<TxHash> {
        let tx_hash: TxHash = self
            .provider
            .raw_request(
                Cow::Borrowed("tenderly_setBalance"),
                (vec![self.address], amount),
            )
            .await?;

        debug!(address = %self.address, amount = %amount, event = "native_balance_set");
        Ok(tx_hash)
    }

    async fn set_erc20_balance(&self, token: Address, amount: U256) -> Result<TxHash> {
        let tx_hash: TxHash = self
            .provider
            .raw_request(
                Cow::Borrowed("tenderly_setErc20Balance"),
                (token, self.address, amount),
            )
            .await?;

        debug!(
            address = %self.address,
            token = %token,
            amount = %amount,
            event = "erc20_balance_set"
        );
        Ok(tx_hash)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let tx = Erc20Contract::new(token, self.provider.clone())
            .approve_transaction(self.address, spender, amount);
        let receipt = send_transaction(&self.provider, tx, "approve", self.chain_id).await?;
        Ok(receipt.transaction_hash)
    }

    async fn fill_relay(
        &self,
        spoke_pool: Address,
        relay_data: V3RelayData,
        repayment_chain_id: u64,
    ) -> Result<TxHash> {
        let span = spans::fill_relay(relay_data.depositId, &self.address, &spoke_pool);

        async move {
            let tx = SpokePoolContract::new(spoke_pool, self.provider.clone())
                .fill_v3_relay_transaction(self.address, relay_data, repayment_chain_id);
            let receipt = simulate_and_send(&self.provider, tx, "fill", self.chain_id).await?;
            Ok(receipt.transaction_hash)
        }
        .instrument(span)
        .await
    }
}

/// [`SimulationEnvironment`] backed by Tenderly virtual testnets and the
/// Across app API
pub struct TenderlyEnvironment {
    tenderly: TenderlyClient,
    testnet_ids: TestnetIdLog,
    http: Client,
    across_api_url: String,
    quotes: Arc<dyn QuoteProvider>,
    polling: PollingConfig,
}

impl TenderlyEnvironment {
    pub fn new(settings: &SimulationSettings, quotes: Arc<dyn QuoteProvider>) -> Result<Self> {
        let http = http_client()?;
        Ok(Self {
            tenderly: TenderlyClient::new(
                http.clone(),
                settings.tenderly_access_key.clone(),
                settings.tenderly_account.clone(),
                settings.tenderly_project.clone(),
            ),
            testnet_ids: TestnetIdLog::new(settings.testnet_ids_path.clone()),
            http,
            across_api_url: settings.across_api_url.clone(),
            quotes,
            polling: PollingConfig::forked_network(),
        })
    }

    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }
}

#[async_trait]
impl SimulationEnvironment for TenderlyEnvironment {
    type Wallet = TenderlyWallet;
    type Bridge = AcrossClient<DynProvider<Ethereum>>;

    async fn provision(&self, chain_id: u64) -> Result<VirtualTestnet> {
        let testnet = self.tenderly.create_virtual_testnet(chain_id).await?;
        self.testnet_ids.append(&testnet.id);
        Ok(testnet)
    }

    async fn connect_wallet(
        &self,
        testnet: &VirtualTestnet,
        signer: PrivateKeySigner,
    ) -> Result<Self::Wallet> {
        Ok(TenderlyWallet::connect(testnet, signer))
    }

    async fn connect_bridge(
        &self,
        _origin: &VirtualTestnet,
        destination: &VirtualTestnet,
        depositor: &Self::Wallet,
    ) -> Result<Self::Bridge> {
        let destination_provider = ProviderBuilder::new()
            .connect_http(destination.rpc_url.clone())
            .erased();

        Ok(AcrossClient::builder()
            .origin_provider(depositor.provider().clone())
            .destination_provider(destination_provider)
            .depositor(depositor.address())
            .api_url(self.across_api_url.clone())
            .http(self.http.clone())
            .quotes(Arc::clone(&self.quotes))
            .polling(self.polling)
            .build())
    }

    fn tx_url(&self, testnet: &VirtualTestnet, tx_hash: &TxHash) -> String {
        tenderly_tx_url(testnet, tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_tx_url() {
        let testnet = VirtualTestnet {
            id: "0b9f6a8e-vnet".to_string(),
            chain_id: 8453,
            rpc_url: Url::parse("https://virtual.base.rpc.tenderly.co/admin").unwrap(),
            account: "acme".to_string(),
            project: "project".to_string(),
            tenderly_name: "base",
        };
        let tx_hash = b256!("1111111111111111111111111111111111111111111111111111111111111111");

        insta::assert_snapshot!(
            tenderly_tx_url(&testnet, &tx_hash),
            @"https://dashboard.tenderly.co/acme/project/testnet/0b9f6a8e-vnet/tx/base/0x1111111111111111111111111111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_parse_created_testnet_picks_admin_rpc() {
        let json = r#"{
            "id": "vnet-123",
            "slug": "across-base-1700000000",
            "rpcs": [
                {"url": "https://virtual.base.rpc.tenderly.co/public", "name": "Public RPC"},
                {"url": "https://virtual.base.rpc.tenderly.co/admin", "name": "Admin RPC"}
            ]
        }"#;
        let created: CreatedVirtualTestnet = serde_json::from_str(json).unwrap();

        assert_eq!(created.id, "vnet-123");
        assert_eq!(
            created.admin_rpc().map(Url::as_str),
            Some("https://virtual.base.rpc.tenderly.co/admin")
        );
    }

    #[test]
    fn test_vnets_url() {
        let client = TenderlyClient::new(Client::new(), "key", "acme", "project");
        insta::assert_snapshot!(
            client.vnets_url().unwrap().as_str(),
            @"https://api.tenderly.co/api/v1/account/acme/project/project/vnets"
        );
    }
}
