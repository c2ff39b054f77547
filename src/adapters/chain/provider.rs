//! Ethereum RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the JSON-RPC connection used for allowance reads and
//! approval submission. Connectivity is validated once at startup.
//!
//! In alloy 0.9, the builder's concrete provider type is a deep
//! filler stack over a specific transport. Connecting through
//! `on_builtin` boxes the transport, so the result can be stored as a
//! type-erased `dyn Provider` to keep the API clean across the
//! adapter layer.

use std::sync::Arc;

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::ChainConfig;

/// Shared Ethereum RPC provider backed by alloy-rs 0.9.
///
/// All chain operations share a single provider instance to avoid
/// redundant connections and enable connection pooling.
pub struct EthereumProvider {
    /// The alloy HTTP provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Chain id reported by the endpoint at startup.
    chain_id: u64,
}

impl EthereumProvider {
    /// Connect to the configured RPC endpoint and validate connectivity.
    #[instrument(skip_all)]
    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        // on_builtin erases the transport, matching the dyn Provider
        // default. on_http would pin the concrete Http transport.
        let provider = ProviderBuilder::new()
            .on_builtin(&config.rpc_url)
            .await
            .context("Failed to connect to RPC endpoint")?;

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        info!(chain_id, "Connected to Ethereum RPC");

        Ok(Self { provider, chain_id })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Chain id observed at connect time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn chain_config(rpc_url: &str) -> ChainConfig {
        ChainConfig {
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            rpc_url: rpc_url.to_string(),
        }
    }

    #[tokio::test]
    async fn connect_reports_the_endpoint_chain_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).body_includes("eth_chainId");
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 0, "result": "0x1" }));
            })
            .await;

        let provider = EthereumProvider::connect(&chain_config(&server.base_url()))
            .await
            .unwrap();
        assert_eq!(provider.chain_id(), 1);
    }

    #[tokio::test]
    async fn connect_rejects_an_unparseable_endpoint() {
        let result = EthereumProvider::connect(&chain_config("not a url")).await;
        assert!(result.is_err());
    }
}
