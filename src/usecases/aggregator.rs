//! Swap Aggregator - Concurrent Multi-Source Dispatch
//!
//! Fans one request out to every registered liquidity source at once,
//! tolerating individual failures, and returns one result envelope per
//! source in registration order. Quotes are annotated with a markup
//! against the best destination amount in the batch; trades carry an
//! approval posture on top.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::OnceCell;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, instrument, warn};

use crate::adapters::sources::{Dexag, OneInch, Paraswap, Totle, ZeroEx};
use crate::config::AppConfig;
use crate::domain::token::find_by_address;
use crate::domain::{ranking, Quote, QuoteRequest, SourceError, TokenInfo, Trade, TradeRequest};
use crate::ports::{LiquiditySource, Wallet};

use super::approvals::{self, ApprovalStatus};
use super::normalize;
use super::reconcile;

/// One source's answer to a quote request.
#[derive(Debug, Serialize)]
pub struct AggregatedQuote {
    /// Source identifier, stable across runs.
    pub source: &'static str,
    /// The quote, or the reason this source could not produce one.
    pub result: Result<Quote, SourceError>,
    /// `+DD.DD%` shortfall against the batch's best destination
    /// amount; absent for failures and zero-amount quotes.
    pub markup: Option<String>,
    /// Wall-clock time this source took to answer.
    pub fetch_ms: u64,
}

/// One source's answer to a trade request.
#[derive(Debug, Serialize)]
pub struct AggregatedTrade {
    pub source: &'static str,
    pub result: Result<Trade, SourceError>,
    pub markup: Option<String>,
    /// Approval posture of the trade; absent for failures.
    pub approval: Option<ApprovalStatus>,
    pub fetch_ms: u64,
}

/// Meta-aggregator over a fixed, ordered set of liquidity sources.
pub struct SwapAggregator {
    /// Sources in registration order; result batches mirror this order.
    sources: Vec<Arc<dyn LiquiditySource>>,
    /// Synthetic catalog entry for the chain's native asset.
    native: TokenInfo,
    /// Reconciled canonical catalog, built once on first use.
    catalog: OnceCell<Arc<Vec<TokenInfo>>>,
    /// Upper bound on one source's whole quote/trade call.
    source_timeout: Duration,
}

impl SwapAggregator {
    /// Build the aggregator with the five production sources wired to
    /// their configured endpoints, sharing one HTTP client.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let request_timeout = Duration::from_millis(config.http.request_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let sources: Vec<Arc<dyn LiquiditySource>> = vec![
            Arc::new(Paraswap::new(
                client.clone(),
                &config.sources.paraswap,
                request_timeout,
            )),
            Arc::new(OneInch::new(
                client.clone(),
                &config.sources.oneinch,
                request_timeout,
            )),
            Arc::new(Totle::new(
                client.clone(),
                &config.sources.totle,
                request_timeout,
            )),
            Arc::new(Dexag::new(
                client.clone(),
                &config.sources.dexag,
                request_timeout,
            )),
            Arc::new(ZeroEx::new(client, &config.sources.zeroex, request_timeout)),
        ];

        info!(
            sources = sources.len(),
            native = %config.chain.native_symbol,
            "Swap aggregator initialized"
        );

        Ok(Self {
            sources,
            native: TokenInfo::native(
                config.chain.native_symbol.clone(),
                config.chain.native_decimals,
            ),
            catalog: OnceCell::new(),
            source_timeout: Duration::from_millis(config.http.source_timeout_ms),
        })
    }

    /// Build an aggregator over arbitrary sources. Used by tests and
    /// benchmarks to inject stubs.
    pub fn with_sources(
        sources: Vec<Arc<dyn LiquiditySource>>,
        native: TokenInfo,
        source_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            native,
            catalog: OnceCell::new(),
            source_timeout,
        }
    }

    /// Sources in registration order.
    pub fn sources(&self) -> &[Arc<dyn LiquiditySource>] {
        &self.sources
    }

    /// The reconciled canonical token catalog.
    ///
    /// Built on first call from every reachable source's catalog,
    /// translated to canonical space, then memoized. Sources whose
    /// catalog fetch failed contribute nothing.
    pub async fn tokens(&self) -> Arc<Vec<TokenInfo>> {
        Arc::clone(
            self.catalog
                .get_or_init(|| async { Arc::new(self.build_catalog().await) })
                .await,
        )
    }

    async fn build_catalog(&self) -> Vec<TokenInfo> {
        let fetches = join_all(self.sources.iter().map(|s| s.tokens())).await;

        let mut canonical: Vec<Vec<TokenInfo>> = Vec::with_capacity(self.sources.len());
        for (source, fetched) in self.sources.iter().zip(fetches) {
            match fetched {
                Ok(catalog) => {
                    let placeholder = source.native_placeholder();
                    canonical.push(
                        catalog
                            .iter()
                            .map(|token| TokenInfo {
                                address: normalize::to_canonical_space(token.address, placeholder),
                                ..token.clone()
                            })
                            .collect(),
                    );
                }
                Err(e) => {
                    warn!(source = source.id(), error = %e, "Token catalog unavailable");
                }
            }
        }

        let views: Vec<&[TokenInfo]> = canonical.iter().map(Vec::as_slice).collect();
        let merged = reconcile::reconcile(&self.native, &views);
        info!(
            tokens = merged.len(),
            catalogs = canonical.len(),
            "Canonical token catalog reconciled"
        );
        merged
    }

    /// Fan a quote request out to every source concurrently.
    ///
    /// Always returns exactly one envelope per source, in registration
    /// order, regardless of individual failures.
    #[instrument(skip(self, request), fields(
        source_token = %request.source_token,
        destination_token = %request.destination_token,
    ))]
    pub async fn fetch_quotes(&self, request: &QuoteRequest) -> Vec<AggregatedQuote> {
        let dispatches = self.sources.iter().map(|source| async {
            let started = Instant::now();
            let result = self.dispatch_quote(source.as_ref(), request).await;
            (source.id(), result, elapsed_ms(started))
        });
        let answers = join_all(dispatches).await;

        let amounts: Vec<Option<alloy::primitives::U256>> = answers
            .iter()
            .map(|(_, result, _)| result.as_ref().ok().map(|q| q.destination_amount))
            .collect();
        let markups = ranking::markups(&amounts);

        let batch: Vec<AggregatedQuote> = answers
            .into_iter()
            .zip(markups)
            .map(|((source, result, fetch_ms), markup)| AggregatedQuote {
                source,
                result,
                markup,
                fetch_ms,
            })
            .collect();

        info!(
            succeeded = batch.iter().filter(|q| q.result.is_ok()).count(),
            total = batch.len(),
            "Quote batch complete"
        );
        batch
    }

    /// Fan a trade request out to every source concurrently, then
    /// resolve each successful trade's approval posture.
    #[instrument(skip(self, request, wallet), fields(
        source_token = %request.source_token,
        destination_token = %request.destination_token,
        user = %request.user_address,
    ))]
    pub async fn fetch_trades(
        &self,
        request: &TradeRequest,
        wallet: &Arc<dyn Wallet>,
    ) -> Vec<AggregatedTrade> {
        let dispatches = self.sources.iter().map(|source| async {
            let started = Instant::now();
            let result = self.dispatch_trade(source.as_ref(), request).await;
            (source.id(), result, elapsed_ms(started))
        });
        let answers = join_all(dispatches).await;

        let results: Vec<Result<Trade, SourceError>> =
            answers.iter().map(|(_, result, _)| result.clone()).collect();
        let approvals = approvals::resolve(&self.sources, &results, request, wallet).await;

        let amounts: Vec<Option<alloy::primitives::U256>> = results
            .iter()
            .map(|result| result.as_ref().ok().map(|t| t.destination_amount))
            .collect();
        let markups = ranking::markups(&amounts);

        let batch: Vec<AggregatedTrade> = answers
            .into_iter()
            .zip(markups)
            .zip(approvals)
            .map(|(((source, result, fetch_ms), markup), approval)| AggregatedTrade {
                source,
                result,
                markup,
                approval,
                fetch_ms,
            })
            .collect();

        info!(
            succeeded = batch.iter().filter(|t| t.result.is_ok()).count(),
            total = batch.len(),
            "Trade batch complete"
        );
        batch
    }

    /// One source's quote call: catalog validation, address-space
    /// translation, timeout enforcement.
    async fn dispatch_quote(
        &self,
        source: &dyn LiquiditySource,
        request: &QuoteRequest,
    ) -> Result<Quote, SourceError> {
        let placeholder = source.native_placeholder();
        let source_request = normalize::quote_request_for_source(request, placeholder);
        self.validate_legs(
            source,
            source_request.source_token,
            source_request.destination_token,
        )
        .await?;

        match timeout(self.source_timeout, source.quote(&source_request)).await {
            Ok(result) => result.map(|quote| normalize::quote_to_canonical(quote, placeholder)),
            Err(_) => {
                warn!(source = source.id(), "Quote timed out");
                Err(SourceError::Unavailable(format!(
                    "timed out after {}ms",
                    self.source_timeout.as_millis()
                )))
            }
        }
    }

    /// One source's trade call; same envelope rules as quotes.
    async fn dispatch_trade(
        &self,
        source: &dyn LiquiditySource,
        request: &TradeRequest,
    ) -> Result<Trade, SourceError> {
        let placeholder = source.native_placeholder();
        let source_request = normalize::trade_request_for_source(request, placeholder);
        self.validate_legs(
            source,
            source_request.source_token,
            source_request.destination_token,
        )
        .await?;

        match timeout(self.source_timeout, source.trade(&source_request)).await {
            Ok(result) => result.map(|trade| normalize::trade_to_canonical(trade, placeholder)),
            Err(_) => {
                warn!(source = source.id(), "Trade timed out");
                Err(SourceError::Unavailable(format!(
                    "timed out after {}ms",
                    self.source_timeout.as_millis()
                )))
            }
        }
    }

    /// Reject legs absent from the source's own catalog before any
    /// quote or trade call goes out. Addresses arrive here already in
    /// the source's space; the error reports the canonical form.
    async fn validate_legs(
        &self,
        source: &dyn LiquiditySource,
        source_leg: alloy::primitives::Address,
        destination_leg: alloy::primitives::Address,
    ) -> Result<(), SourceError> {
        let catalog = source.tokens().await?;
        let placeholder = source.native_placeholder();
        for leg in [source_leg, destination_leg] {
            if find_by_address(&catalog, leg).is_none() {
                let canonical = normalize::to_canonical_space(leg, placeholder);
                debug!(source = source.id(), token = %canonical, "Asset not in source catalog");
                return Err(SourceError::UnsupportedAsset(canonical));
            }
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
