//! 1inch adapter.
//!
//! Address-space service, mainnet only. Quotes and trades are single
//! GET requests; the token catalog comes back as a map keyed by
//! address. 1inch wants slippage as a percent between 0 and 100.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{address, Address};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::config::OneInchConfig;
use crate::domain::{Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest};
use crate::ports::LiquiditySource;

use super::http::SourceHttp;
use super::{
    lowercase_hex, normalize_tokens, parse_wire_address, parse_wire_amount, parse_wire_bytes,
    slippage_percent, CatalogCell, WireToken,
};

const SOURCE_ID: &str = "oneinch";

/// 1inch router the user grants ERC-20 allowance to.
const SPENDER: Address = address!("e4c9194962532feb467dce8b3d42419641c6ed2e");

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "toTokenAmount")]
    to_token_amount: String,
}

#[derive(Debug, Deserialize)]
struct SwapQuoteResponse {
    #[serde(rename = "toTokenAmount")]
    to_token_amount: String,
    to: String,
    data: String,
    value: String,
}

/// `LiquiditySource` implementation for the 1inch API.
pub struct OneInch {
    http: SourceHttp,
    catalog: CatalogCell,
}

impl OneInch {
    pub fn new(client: reqwest::Client, config: &OneInchConfig, timeout: Duration) -> Self {
        Self {
            http: SourceHttp::new(client, config.base_url.clone(), timeout),
            catalog: CatalogCell::new(),
        }
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let response: HashMap<String, WireToken> = self.http.get_json("/tokens", &[]).await?;
        Ok(normalize_tokens(
            SOURCE_ID,
            response.into_values().collect(),
        ))
    }
}

#[async_trait]
impl LiquiditySource for OneInch {
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
            ("fromTokenAddress", lowercase_hex(request.source_token)),
            ("toTokenAddress", lowercase_hex(request.destination_token)),
            ("amount", request.source_amount.to_string()),
            ("disableEstimate", "false".to_string()),
            ("slippage", "1".to_string()),
        ];
        let response: QuoteResponse = self.http.get_json("/quote", &query).await?;

        Ok(Quote {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: parse_wire_amount(&response.to_token_amount, "toTokenAmount")?,
        })
    }

    #[instrument(skip(self, request))]
    async fn trade(&self, request: &TradeRequest) -> Result<Trade, SourceError> {
        let query = [
            ("fromTokenAddress", lowercase_hex(request.source_token)),
            ("toTokenAddress", lowercase_hex(request.destination_token)),
            ("amount", request.source_amount.to_string()),
            ("fromAddress", lowercase_hex(request.user_address)),
            ("slippage", slippage_percent(request.slippage_bps).to_string()),
            ("disableEstimate", "true".to_string()),
        ];
        let response: SwapQuoteResponse = self.http.get_json("/swapQuote", &query).await?;

        Ok(Trade {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: parse_wire_amount(&response.to_token_amount, "toTokenAmount")?,
            from: request.user_address,
            to: parse_wire_address(&response.to, "to")?,
            value: parse_wire_amount(&response.value, "value")?,
            data: parse_wire_bytes(&response.data, "data")?,
        })
    }
}
