//! Totle adapter.
//!
//! Address-space service, mainnet only, and the one source whose
//! native placeholder is the zero address (same as canonical). Quotes
//! and trades both POST to `/swap`; the trade variant asks for the
//! transaction payload and extracts the `swap`-typed entry from the
//! returned transaction list.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{address, Address};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::TotleConfig;
use crate::domain::{Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest, NATIVE_SENTINEL};
use crate::ports::LiquiditySource;

use super::http::SourceHttp;
use super::{
    lowercase_hex, normalize_tokens, parse_wire_address, parse_wire_amount, parse_wire_bytes,
    slippage_percent, CatalogCell, WireToken,
};

const SOURCE_ID: &str = "totle";

/// Totle primary contract the user grants ERC-20 allowance to.
const SPENDER: Address = address!("74758acfce059f503a7e6b0fc2c8737600f9f2c4");

/// Fixed market-slippage ceiling sent with plain quotes (percent).
const QUOTE_MARKET_SLIPPAGE: &str = "10";
/// Fixed execution-slippage ceiling sent with plain quotes (percent).
const QUOTE_EXECUTION_SLIPPAGE: &str = "3";

#[derive(Debug, Deserialize)]
struct TokensResponse {
    tokens: Vec<WireToken>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapLeg {
    source_asset: String,
    destination_asset: String,
    source_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_market_slippage_percent: Option<String>,
    max_execution_slippage_percent: String,
}

#[derive(Debug, Serialize)]
struct SwapConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<Strategy>,
    #[serde(rename = "skipBalanceChecks", skip_serializing_if = "Option::is_none")]
    skip_balance_checks: Option<bool>,
    transactions: bool,
}

#[derive(Debug, Serialize)]
struct Strategy {
    main: &'static str,
    backup: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody {
    swap: SwapLeg,
    config: SwapConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TradeBody {
    swaps: Vec<SwapLeg>,
    config: SwapConfig,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SwapResponse {
    success: bool,
    #[serde(default)]
    response: Option<SwapPayload>,
}

#[derive(Debug, Deserialize)]
struct SwapPayload {
    #[serde(default)]
    summary: Vec<SwapSummary>,
    #[serde(default)]
    transactions: Vec<SwapTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapSummary {
    destination_amount: String,
}

#[derive(Debug, Deserialize)]
struct SwapTransaction {
    #[serde(rename = "type")]
    kind: String,
    tx: WireTransaction,
}

#[derive(Debug, Deserialize)]
struct WireTransaction {
    to: String,
    data: String,
    value: String,
}

/// `LiquiditySource` implementation for the Totle API.
pub struct Totle {
    http: SourceHttp,
    api_key: Option<String>,
    catalog: CatalogCell,
}

impl Totle {
    pub fn new(client: reqwest::Client, config: &TotleConfig, timeout: Duration) -> Self {
        Self {
            http: SourceHttp::new(client, config.base_url.clone(), timeout),
            api_key: config.api_key.clone(),
            catalog: CatalogCell::new(),
        }
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let response: TokensResponse = self.http.get_json("/tokens", &[]).await?;
        Ok(normalize_tokens(SOURCE_ID, response.tokens))
    }
}

/// Unwrap a Totle envelope or surface its failure.
fn payload(response: SwapResponse) -> Result<SwapPayload, SourceError> {
    if !response.success {
        return Err(SourceError::Unavailable(
            "totle reported an unsuccessful swap request".to_string(),
        ));
    }
    response
        .response
        .ok_or_else(|| SourceError::Unavailable("totle response payload missing".to_string()))
}

fn summary_amount(payload: &SwapPayload) -> Result<alloy::primitives::U256, SourceError> {
    let summary = payload
        .summary
        .first()
        .ok_or_else(|| SourceError::Unavailable("totle summary missing".to_string()))?;
    parse_wire_amount(&summary.destination_amount, "destinationAmount")
}

#[async_trait]
impl LiquiditySource for Totle {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn native_placeholder(&self) -> Address {
        // Totle already speaks the canonical zero-address convention.
        NATIVE_SENTINEL
    }

    fn approval_spender(&self) -> Option<Address> {
        Some(SPENDER)
    }

    async fn tokens(&self) -> Result<Arc<Vec<TokenInfo>>, SourceError> {
        self.catalog
            .get_or_fetch(SOURCE_ID, || self.fetch_tokens())
            .await
    }

    #[instrument(skip(self, request))]
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, SourceError> {
        let body = QuoteBody {
            swap: SwapLeg {
                source_asset: lowercase_hex(request.source_token),
                destination_asset: lowercase_hex(request.destination_token),
                source_amount: request.source_amount.to_string(),
                max_market_slippage_percent: Some(QUOTE_MARKET_SLIPPAGE.to_string()),
                max_execution_slippage_percent: QUOTE_EXECUTION_SLIPPAGE.to_string(),
            },
            config: SwapConfig {
                strategy: None,
                skip_balance_checks: None,
                transactions: false,
            },
        };
        let response: SwapResponse = self.http.post_json("/swap", &body).await?;
        let payload = payload(response)?;

        Ok(Quote {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: summary_amount(&payload)?,
        })
    }

    #[instrument(skip(self, request))]
    async fn trade(&self, request: &TradeRequest) -> Result<Trade, SourceError> {
        let body = TradeBody {
            swaps: vec![SwapLeg {
                source_asset: lowercase_hex(request.source_token),
                destination_asset: lowercase_hex(request.destination_token),
                source_amount: request.source_amount.to_string(),
                max_market_slippage_percent: None,
                max_execution_slippage_percent: slippage_percent(request.slippage_bps).to_string(),
            }],
            config: SwapConfig {
                strategy: Some(Strategy {
                    main: "curves",
                    backup: "curves",
                }),
                skip_balance_checks: Some(false),
                transactions: true,
            },
            address: lowercase_hex(request.user_address),
            api_key: self.api_key.clone(),
        };
        let response: SwapResponse = self.http.post_json("/swap", &body).await?;
        let payload = payload(response)?;
        let destination_amount = summary_amount(&payload)?;

        let swap_tx = payload
            .transactions
            .iter()
            .find(|t| t.kind == "swap")
            .ok_or_else(|| SourceError::Unavailable("totle swap transaction missing".to_string()))?;

        Ok(Trade {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount,
            from: request.user_address,
            to: parse_wire_address(&swap_tx.tx.to, "to")?,
            value: parse_wire_amount(&swap_tx.tx.value, "value")?,
            data: parse_wire_bytes(&swap_tx.tx.data, "data")?,
        })
    }
}
