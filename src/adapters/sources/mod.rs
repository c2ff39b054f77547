//! Liquidity Source Adapters
//!
//! One module per external service. Each adapter speaks its own wire
//! protocol; shared pieces are the HTTP helper, the catalog cell that
//! memoizes the construction-time token fetch, and the wire parsing
//! helpers that map malformed payloads into `SourceError`.

pub mod dexag;
pub mod http;
pub mod oneinch;
pub mod paraswap;
pub mod totle;
pub mod zeroex;

pub use dexag::Dexag;
pub use oneinch::OneInch;
pub use paraswap::Paraswap;
pub use totle::Totle;
pub use zeroex::ZeroEx;

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::domain::{SourceError, TokenInfo};

/// One-time, outcome-memoizing holder for a source's token catalog.
///
/// The first call runs the fetch; every later call returns the cached
/// outcome. A failed fetch is cached too: the source stays unusable
/// for the process lifetime instead of hammering a broken endpoint,
/// and surfaces as `ConstructionFailed` on every operation.
#[derive(Debug, Default)]
pub(crate) struct CatalogCell {
    cell: OnceCell<Result<Arc<Vec<TokenInfo>>, String>>,
}

impl CatalogCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<F, Fut>(
        &self,
        source_id: &'static str,
        fetch: F,
    ) -> Result<Arc<Vec<TokenInfo>>, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<TokenInfo>, SourceError>>,
    {
        let outcome = self
            .cell
            .get_or_init(|| async {
                match fetch().await {
                    Ok(tokens) => Ok(Arc::new(tokens)),
                    Err(err) => {
                        warn!(source = source_id, error = %err, "Token catalog fetch failed");
                        Err(err.to_string())
                    }
                }
            })
            .await;

        match outcome {
            Ok(tokens) => Ok(Arc::clone(tokens)),
            Err(reason) => Err(SourceError::ConstructionFailed(reason.clone())),
        }
    }
}

/// Token entry as every service reports it: address string (any case),
/// symbol, decimals.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireToken {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parse wire tokens into catalog entries, dropping entries whose
/// address does not parse instead of failing the whole catalog.
pub(crate) fn normalize_tokens(source_id: &'static str, raw: Vec<WireToken>) -> Vec<TokenInfo> {
    raw.into_iter()
        .filter_map(|token| match token.address.parse::<Address>() {
            Ok(address) => Some(TokenInfo {
                address,
                symbol: token.symbol,
                decimals: token.decimals,
            }),
            Err(_) => {
                debug!(
                    source = source_id,
                    address = %token.address,
                    symbol = %token.symbol,
                    "Dropping token with unparseable address"
                );
                None
            }
        })
        .collect()
}

/// Lowercase hex rendering for addresses going onto the wire.
pub(crate) fn lowercase_hex(address: Address) -> String {
    format!("0x{}", alloy::hex::encode(address))
}

/// Parse an address field from a response.
pub(crate) fn parse_wire_address(raw: &str, field: &str) -> Result<Address, SourceError> {
    raw.parse::<Address>()
        .map_err(|err| SourceError::Unavailable(format!("invalid {field} address {raw:?}: {err}")))
}

/// Parse an atomic amount field (decimal or 0x-hex string).
pub(crate) fn parse_wire_amount(raw: &str, field: &str) -> Result<U256, SourceError> {
    raw.trim()
        .parse::<U256>()
        .map_err(|err| SourceError::Unavailable(format!("invalid {field} amount {raw:?}: {err}")))
}

/// Parse a calldata field.
pub(crate) fn parse_wire_bytes(raw: &str, field: &str) -> Result<Bytes, SourceError> {
    raw.parse::<Bytes>()
        .map_err(|err| SourceError::Unavailable(format!("invalid {field} data {raw:?}: {err}")))
}

/// Parse a display-amount or price field, tolerating scientific notation.
pub(crate) fn parse_wire_decimal(raw: &str, field: &str) -> Result<Decimal, SourceError> {
    let trimmed = raw.trim();
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        trimmed.parse::<Decimal>()
    };
    parsed.map_err(|err| SourceError::Unavailable(format!("invalid {field} value {raw:?}: {err}")))
}

/// Render the caller's basis-point slippage as a percent (0-100).
pub(crate) fn slippage_percent(bps: u32) -> Decimal {
    Decimal::new(i64::from(bps), 2).normalize()
}

/// Render the caller's basis-point slippage as a fraction (0-1).
pub(crate) fn slippage_fraction(bps: u32) -> Decimal {
    Decimal::new(i64::from(bps), 4).normalize()
}
