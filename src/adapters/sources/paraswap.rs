//! ParaSwap adapter.
//!
//! Address-space service. A trade is two calls: `GET /prices` for the
//! best route, then `POST /transactions` echoing the raw `priceRoute`
//! back together with a slippage-adjusted destination limit. The limit
//! is `amount * 10000 / (10000 + slippage_bps)`, computed in exact
//! integer math. ParaSwap's spender is the trade's own target
//! contract, so `approval_spender` is `None`.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::config::ParaswapConfig;
use crate::domain::{Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest};
use crate::ports::LiquiditySource;

use super::http::SourceHttp;
use super::{
    lowercase_hex, normalize_tokens, parse_wire_address, parse_wire_amount, parse_wire_bytes,
    CatalogCell, WireToken,
};

const SOURCE_ID: &str = "paraswap";

/// Referrer tag sent with every transaction build request.
const REFERRER: &str = "swapmesh";

#[derive(Debug, Deserialize)]
struct TokensResponse {
    tokens: Vec<WireToken>,
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(rename = "priceRoute")]
    price_route: Value,
}

impl PricesResponse {
    /// Destination amount carried inside the opaque price route.
    fn amount(&self) -> Result<U256, SourceError> {
        let raw = self
            .price_route
            .get("amount")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SourceError::Unavailable("priceRoute.amount missing from response".to_string())
            })?;
        parse_wire_amount(raw, "priceRoute")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildTransactionRequest<'a> {
    /// Raw route from `/prices`, echoed back untouched.
    price_route: &'a Value,
    src_token: String,
    dest_token: String,
    src_amount: String,
    dest_amount: String,
    user_address: String,
    referrer: &'a str,
    pay_to: &'a str,
}

#[derive(Debug, Deserialize)]
struct BuildTransactionResponse {
    from: String,
    to: String,
    value: String,
    data: String,
}

/// `LiquiditySource` implementation for the ParaSwap API.
pub struct Paraswap {
    http: SourceHttp,
    network: u32,
    catalog: CatalogCell,
}

impl Paraswap {
    pub fn new(client: reqwest::Client, config: &ParaswapConfig, timeout: Duration) -> Self {
        Self {
            http: SourceHttp::new(client, config.base_url.clone(), timeout),
            network: config.network,
            catalog: CatalogCell::new(),
        }
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let response: TokensResponse = self
            .http
            .get_json(&format!("/tokens/{}", self.network), &[])
            .await?;
        Ok(normalize_tokens(SOURCE_ID, response.tokens))
    }

    async fn fetch_prices(&self, request: &QuoteRequest) -> Result<PricesResponse, SourceError> {
        let path = format!(
            "/prices/{}/{}/{}/{}",
            self.network,
            lowercase_hex(request.source_token),
            lowercase_hex(request.destination_token),
            request.source_amount
        );
        self.http.get_json(&path, &[]).await
    }

    /// Destination limit after applying the slippage tolerance:
    /// `amount * 10000 / (10000 + bps)`. Rejects amounts whose scaled
    /// intermediate does not fit in 256 bits instead of wrapping.
    fn limit_amount(amount: U256, slippage_bps: u32) -> Result<U256, SourceError> {
        let scale = U256::from(10_000u64);
        amount
            .checked_mul(scale)
            .map(|scaled| scaled / (scale + U256::from(slippage_bps)))
            .ok_or_else(|| {
                SourceError::Unavailable(format!("destination limit overflow: {amount}"))
            })
    }
}

#[async_trait]
impl LiquiditySource for Paraswap {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn native_placeholder(&self) -> Address {
        crate::domain::ETH_PLACEHOLDER
    }

    fn approval_spender(&self) -> Option<Address> {
        // The spender is whichever contract the built trade targets.
        None
    }

    async fn tokens(&self) -> Result<Arc<Vec<TokenInfo>>, SourceError> {
        self.catalog
            .get_or_fetch(SOURCE_ID, || self.fetch_tokens())
            .await
    }

    #[instrument(skip(self, request))]
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, SourceError> {
        let prices = self.fetch_prices(request).await?;
        Ok(Quote {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: prices.amount()?,
        })
    }

    #[instrument(skip(self, request))]
    async fn trade(&self, request: &TradeRequest) -> Result<Trade, SourceError> {
        let quote_request = request.quote_request();
        let prices = self.fetch_prices(&quote_request).await?;
        let destination_amount = prices.amount()?;
        let limit = Self::limit_amount(destination_amount, request.slippage_bps)?;

        let body = BuildTransactionRequest {
            price_route: &prices.price_route,
            src_token: lowercase_hex(request.source_token),
            dest_token: lowercase_hex(request.destination_token),
            src_amount: request.source_amount.to_string(),
            dest_amount: limit.to_string(),
            user_address: lowercase_hex(request.user_address),
            referrer: REFERRER,
            pay_to: "",
        };
        let built: BuildTransactionResponse = self
            .http
            .post_json(&format!("/transactions/{}", self.network), &body)
            .await?;

        Ok(Trade {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount,
            from: parse_wire_address(&built.from, "from")?,
            to: parse_wire_address(&built.to, "to")?,
            value: parse_wire_amount(&built.value, "value")?,
            data: parse_wire_bytes(&built.data, "data")?,
        })
    }
}
