//! Dexag adapter.
//!
//! The odd one out: Dexag speaks ticker symbols and display amounts on
//! the wire, not addresses and atomic integers. Every call resolves
//! both legs to symbols through the source's own catalog, scales the
//! atomic amount down by the source token's decimals, and scales the
//! returned display amount back up by the destination's. The round
//! trip runs entirely on `rust_decimal` so it stays exact far beyond
//! eight significant digits.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{address, Address, U256};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::config::DexagConfig;
use crate::domain::amounts::{to_atomic_amount, to_display_amount};
use crate::domain::{Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest};
use crate::ports::LiquiditySource;

use super::http::SourceHttp;
use super::{
    normalize_tokens, parse_wire_address, parse_wire_amount, parse_wire_bytes, parse_wire_decimal,
    slippage_percent, CatalogCell, WireToken,
};

const SOURCE_ID: &str = "dexag";

/// Dexag proxy contract the user grants ERC-20 allowance to.
const SPENDER: Address = address!("ccaf8533b6822a6c17b1059dda13c168e75544a4");

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: String,
}

#[derive(Debug, Deserialize)]
struct TradeResponse {
    trade: WireTrade,
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct WireTrade {
    to: String,
    data: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    source: MetadataSource,
}

#[derive(Debug, Deserialize)]
struct MetadataSource {
    price: String,
}

/// `LiquiditySource` implementation for the Dexag API.
pub struct Dexag {
    http: SourceHttp,
    catalog: CatalogCell,
}

impl Dexag {
    pub fn new(client: reqwest::Client, config: &DexagConfig, timeout: Duration) -> Self {
        Self {
            http: SourceHttp::new(client, config.base_url.clone(), timeout),
            catalog: CatalogCell::new(),
        }
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let response: Vec<WireToken> = self.http.get_json("/token-list-full", &[]).await?;
        Ok(normalize_tokens(SOURCE_ID, response))
    }

    /// Resolve an address to the source's own symbol + decimals.
    async fn resolve(&self, address: Address) -> Result<TokenInfo, SourceError> {
        let tokens = self.tokens().await?;
        crate::domain::token::find_by_address(&tokens, address)
            .cloned()
            .ok_or(SourceError::UnsupportedAsset(address))
    }

    /// Both legs plus the display-scaled source amount.
    async fn legs(
        &self,
        source_token: Address,
        destination_token: Address,
        source_amount: U256,
    ) -> Result<(TokenInfo, TokenInfo, Decimal), SourceError> {
        let source = self.resolve(source_token).await?;
        let destination = self.resolve(destination_token).await?;
        let display = to_display_amount(source_amount, source.decimals)?;
        Ok((source, destination, display))
    }
}

/// `display * price`, scaled back to the destination's atomic units.
fn destination_atomic(
    display: Decimal,
    price: Decimal,
    destination_decimals: u8,
) -> Result<U256, SourceError> {
    let destination_display = display.checked_mul(price).ok_or_else(|| {
        SourceError::Unavailable(format!("destination amount overflow: {display} * {price}"))
    })?;
    Ok(to_atomic_amount(destination_display, destination_decimals)?)
}

/// `display / (1 + pct/100)`: the worst acceptable fill for the trade.
fn limit_display(display: Decimal, slippage_bps: u32) -> Result<Decimal, SourceError> {
    let factor = Decimal::ONE + slippage_percent(slippage_bps) / Decimal::from(100u64);
    display
        .checked_div(factor)
        .ok_or_else(|| SourceError::Unavailable("slippage limit underflow".to_string()))
}

#[async_trait]
impl LiquiditySource for Dexag {
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
        let (source, destination, display) = self
            .legs(
                request.source_token,
                request.destination_token,
                request.source_amount,
            )
            .await?;

        let query = [
            ("from", source.symbol.clone()),
            ("to", destination.symbol.clone()),
            ("fromAmount", display.normalize().to_string()),
            ("dex", "ag".to_string()),
        ];
        let response: PriceResponse = self.http.get_json("/price", &query).await?;
        let price = parse_wire_decimal(&response.price, "price")?;

        Ok(Quote {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: destination_atomic(display, price, destination.decimals)?,
        })
    }

    #[instrument(skip(self, request))]
    async fn trade(&self, request: &TradeRequest) -> Result<Trade, SourceError> {
        let (source, destination, display) = self
            .legs(
                request.source_token,
                request.destination_token,
                request.source_amount,
            )
            .await?;
        let limit = limit_display(display, request.slippage_bps)?;

        let query = [
            ("from", source.symbol.clone()),
            ("to", destination.symbol.clone()),
            ("fromAmount", display.normalize().to_string()),
            ("limitAmount", limit.normalize().to_string()),
            ("dex", "ag".to_string()),
        ];
        let response: TradeResponse = self.http.get_json("/trade", &query).await?;
        let price = parse_wire_decimal(&response.metadata.source.price, "price")?;

        Ok(Trade {
            source_token: request.source_token,
            destination_token: request.destination_token,
            source_amount: request.source_amount,
            destination_amount: destination_atomic(display, price, destination.decimals)?,
            from: request.user_address,
            to: parse_wire_address(&response.trade.to, "to")?,
            value: parse_wire_amount(&response.trade.value, "value")?,
            data: parse_wire_bytes(&response.trade.data, "data")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn destination_math_is_exact() {
        // 0.0001 ETH at 207.0869659999996272 USDC/ETH, 6 decimals.
        let atomic =
            destination_atomic(dec!(0.0001), dec!(207.0869659999996272), 6).unwrap();
        assert_eq!(atomic, U256::from(20_708u64));
    }

    #[test]
    fn limit_applies_slippage() {
        // 1% on 1.0 leaves 1/1.01.
        let limit = limit_display(dec!(1), 100).unwrap();
        assert!(limit > dec!(0.990099) && limit < dec!(0.990100));
    }
}
