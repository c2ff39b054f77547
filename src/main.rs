//! swapmesh — Entry Point
//!
//! Builds the swap meta-aggregator from `config.toml` and, when a
//! `[demo]` pair is configured, runs one aggregated quote batch for it.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Build SwapAggregator (five sources, shared HTTP client)
//! 4. Reconcile the canonical token catalog
//! 5. Fetch + log a ranked quote batch for the demo pair (if any)

use anyhow::{Context, Result};
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use domain::QuoteRequest;
use usecases::SwapAggregator;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config =
        config::loader::load_config("config.toml").context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        native = %config.chain.native_symbol,
        "Starting swapmesh"
    );

    // ── 3. Build the aggregator ─────────────────────────────
    let aggregator = SwapAggregator::new(&config).context("Failed to build aggregator")?;

    // ── 4. Reconcile the canonical token catalog ────────────
    let catalog = aggregator.tokens().await;
    info!(tokens = catalog.len(), "Canonical catalog ready");

    // ── 5. Run the demo quote batch, if configured ──────────
    let Some(demo) = &config.demo else {
        info!("No [demo] pair configured — exiting after catalog build");
        return Ok(());
    };

    let request = QuoteRequest {
        source_token: demo.source_token,
        destination_token: demo.destination_token,
        source_amount: demo.source_amount,
    };
    let quotes = aggregator.fetch_quotes(&request).await;

    for quote in &quotes {
        match &quote.result {
            Ok(q) => info!(
                source = quote.source,
                destination_amount = %q.destination_amount,
                markup = quote.markup.as_deref().unwrap_or("-"),
                fetch_ms = quote.fetch_ms,
                "Quote"
            ),
            Err(e) => warn!(
                source = quote.source,
                error = %e,
                fetch_ms = quote.fetch_ms,
                "Quote failed"
            ),
        }
    }

    Ok(())
}
