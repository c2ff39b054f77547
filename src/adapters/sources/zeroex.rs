//! 0x adapter.
//!
//! Address-space service, mainnet only. One endpoint serves both plain
//! quotes and executable trades; the trade variant adds the user's
//! slippage as `slippagePercentage`, a fraction between 0 and 1.
//! Allowances go to the 0x ERC-20 proxy, not the trade target.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{address, Address};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::config::ZeroExConfig;
use crate::domain::{Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest};
use crate::ports::LiquiditySource;

use super::http::SourceHttp;
use super::{
    lowercase_hex, normalize_tokens, parse_wire_address, parse_wire_amount, parse_wire_bytes,
    slippage_fraction, CatalogCell, WireToken,
};

const SOURCE_ID: &str = "zeroex";

/// 0x ERC-20 proxy the user grants allowance to (mainnet).
const SPENDER: Address = address!("95e6f48254609a6ee006f7d493c8e5fb97094cef");

#[derive(Debug, Deserialize)]
struct TokensResponse {
    records: Vec<WireToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapQuoteResponse {
    buy_amount: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

/// `LiquiditySource` implementation for the 0x swap API.
pub struct ZeroEx {
    http: SourceHttp,
    catalog: CatalogCell,
}

impl ZeroEx {
    pub fn new(client: reqwest::Client, config: &ZeroExConfig, timeout: Duration) -> Self {
        Self {
            http: SourceHttp::new(client, config.base_url.clone(), timeout),
            catalog: CatalogCell::new(),
        }
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let response: TokensResponse = self.http.get_json("/swap/v0/tokens", &[]).await?;
        Ok(normalize_tokens(SOURCE_ID, response.records))
    }
}

fn required<'a>(field: &'static str, value: Option<&'a String>) -> Result<&'a str, SourceError> {
    value
        .map(String::as_str)
        .ok_or_else(|| SourceError::Unavailable(format!("{field} missing from 0x response")))
}

#[async_trait]
impl LiquiditySource for ZeroEx {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn native_placeholder(&self) -> Address {
        crate::domain::ETH_PLACEHOLDER
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
        let query = [
            ("sellToken", lowercase_hex(request.source_token)),
            ("buyToken", lowercase_hex(request.destination_token)),
            ("sellAmount", request.source_amount.to_string()),
        ];
        let response: SwapQuoteResponse = self.http.get_json("/swap/v0/quote", &query).await?;

        Ok(Quote {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: parse_wire_amount(&response.buy_amount, "buyAmount")?,
        })
    }

    #[instrument(skip(self, request))]
    async fn trade(&self, request: &TradeRequest) -> Result<Trade, SourceError> {
        let query = [
            ("sellToken", lowercase_hex(request.source_token)),
            ("buyToken", lowercase_hex(request.destination_token)),
            ("sellAmount", request.source_amount.to_string()),
            (
                "slippagePercentage",
                slippage_fraction(request.slippage_bps).to_string(),
            ),
        ];
        let response: SwapQuoteResponse = self.http.get_json("/swap/v0/quote", &query).await?;

        Ok(Trade {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: parse_wire_amount(&response.buy_amount, "buyAmount")?,
            from: request.user_address,
            to: parse_wire_address(required("to", response.to.as_ref())?, "to")?,
            value: parse_wire_amount(required("value", response.value.as_ref())?, "value")?,
            data: parse_wire_bytes(required("data", response.data.as_ref())?, "data")?,
        })
    }
}
