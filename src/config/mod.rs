//! Configuration Module - TOML-based Aggregator Configuration
//!
//! Loads and validates configuration from `config.toml`. Endpoint URLs,
//! chain parameters, and timeouts are externalized here - nothing is
//! hardcoded in the domain layer. Base URLs default to the public
//! endpoints and are overridable, which is also how the wire tests
//! point adapters at a local mock server.

pub mod loader;

use alloy::primitives::{Address, U256};
use serde::Deserialize;

/// Top-level aggregator configuration.
///
/// Loaded from `config.toml` at startup and validated before any
/// source is constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Chain identity and native-asset parameters.
    pub chain: ChainConfig,
    /// HTTP client and dispatch timeouts.
    #[serde(default)]
    pub http: HttpConfig,
    /// Per-source endpoint configuration.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Optional demo swap for the binary.
    #[serde(default)]
    pub demo: Option<DemoConfig>,
}

/// Chain identity and native-asset parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Symbol of the chain's native asset (synthetic catalog entry).
    #[serde(default = "default_native_symbol")]
    pub native_symbol: String,
    /// Decimals of the chain's native asset.
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,
    /// JSON-RPC endpoint used for allowance reads and approvals.
    pub rpc_url: String,
}

/// HTTP client and dispatch timeouts.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Timeout for a single HTTP request to a source (milliseconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Upper bound on one source's whole quote/trade call during a
    /// batch (milliseconds). A source exceeding it fails alone.
    #[serde(default = "default_source_timeout")]
    pub source_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout(),
            source_timeout_ms: default_source_timeout(),
        }
    }
}

/// Endpoint configuration for the five sources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub paraswap: ParaswapConfig,
    #[serde(default)]
    pub oneinch: OneInchConfig,
    #[serde(default)]
    pub totle: TotleConfig,
    #[serde(default)]
    pub dexag: DexagConfig,
    #[serde(default)]
    pub zeroex: ZeroExConfig,
}

/// ParaSwap endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ParaswapConfig {
    #[serde(default = "default_paraswap_url")]
    pub base_url: String,
    /// Network id embedded in ParaSwap paths (1 = mainnet).
    #[serde(default = "default_network")]
    pub network: u32,
}

impl Default for ParaswapConfig {
    fn default() -> Self {
        Self {
            base_url: default_paraswap_url(),
            network: default_network(),
        }
    }
}

/// 1inch endpoint configuration (mainnet only).
#[derive(Debug, Clone, Deserialize)]
pub struct OneInchConfig {
    #[serde(default = "default_oneinch_url")]
    pub base_url: String,
}

impl Default for OneInchConfig {
    fn default() -> Self {
        Self {
            base_url: default_oneinch_url(),
        }
    }
}

/// Totle endpoint configuration (mainnet only).
#[derive(Debug, Clone, Deserialize)]
pub struct TotleConfig {
    #[serde(default = "default_totle_url")]
    pub base_url: String,
    /// Partner API key sent with trade requests.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for TotleConfig {
    fn default() -> Self {
        Self {
            base_url: default_totle_url(),
            api_key: None,
        }
    }
}

/// Dexag endpoint configuration (mainnet only).
#[derive(Debug, Clone, Deserialize)]
pub struct DexagConfig {
    #[serde(default = "default_dexag_url")]
    pub base_url: String,
}

impl Default for DexagConfig {
    fn default() -> Self {
        Self {
            base_url: default_dexag_url(),
        }
    }
}

/// 0x endpoint configuration (mainnet only).
#[derive(Debug, Clone, Deserialize)]
pub struct ZeroExConfig {
    #[serde(default = "default_zeroex_url")]
    pub base_url: String,
}

impl Default for ZeroExConfig {
    fn default() -> Self {
        Self {
            base_url: default_zeroex_url(),
        }
    }
}

/// Example swap for the demo binary.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Token being sold (canonical address; zero = native asset).
    pub source_token: Address,
    /// Token being bought.
    pub destination_token: Address,
    /// Amount sold, atomic units (decimal or 0x-hex string).
    pub source_amount: U256,
}

// Default value functions for serde

fn default_native_symbol() -> String {
    "ETH".to_string()
}

fn default_native_decimals() -> u8 {
    18
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_source_timeout() -> u64 {
    10_000
}

fn default_network() -> u32 {
    1
}

fn default_paraswap_url() -> String {
    "https://paraswap.io/api/v1".to_string()
}

fn default_oneinch_url() -> String {
    "https://api.1inch.exchange/v2.0".to_string()
}

fn default_totle_url() -> String {
    "https://api.totle.com".to_string()
}

fn default_dexag_url() -> String {
    "https://api-v2.dex.ag".to_string()
}

fn default_zeroex_url() -> String {
    "https://api.0x.org".to_string()
}
