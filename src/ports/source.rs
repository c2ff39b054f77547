//! Liquidity Source Port - External Quoting Service Interface
//!
//! One implementation per third-party aggregation service. Each
//! implementation speaks its own wire protocol (endpoints, body
//! shapes, symbol-vs-address addressing, decimal handling, slippage
//! convention) behind this uniform capability set.
//!
//! Adapters operate purely in their own address space: translation
//! between the canonical native sentinel and the source's placeholder
//! is applied around them by the dispatcher, never inside them.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::domain::{Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest};

/// Trait for external swap-quoting services.
///
/// `quote` and `trade` fail by returning a `SourceError`, never by
/// panicking, so the dispatcher's fan-out stays uniform. The one
/// fatal-to-the-source condition is a catalog fetch failure, which is
/// memoized: the source answers `ConstructionFailed` for the rest of
/// the process lifetime while its siblings keep working.
#[async_trait]
pub trait LiquiditySource: Send + Sync + 'static {
    /// Stable identifier used in result envelopes and logs.
    fn id(&self) -> &'static str;

    /// The source's own native-asset placeholder address.
    fn native_placeholder(&self) -> Address;

    /// The contract the user must grant an ERC-20 allowance to before
    /// trading through this source. `None` means the spender is the
    /// trade's own target contract.
    fn approval_spender(&self) -> Option<Address>;

    /// The source's full tradable-token catalog, fetched once and
    /// cached (success or failure) for the source's lifetime.
    async fn tokens(&self) -> Result<Arc<Vec<TokenInfo>>, SourceError>;

    /// Best-available rate without an executable payload. Must not
    /// require a connected wallet.
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, SourceError>;

    /// Rate plus an executable transaction template sized to the
    /// requested slippage tolerance.
    async fn trade(&self, request: &TradeRequest) -> Result<Trade, SourceError>;
}
