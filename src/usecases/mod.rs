//! Use Cases - Aggregation Business Logic
//!
//! Orchestrates the liquidity source ports: catalog reconciliation,
//! address-space normalization, concurrent quote/trade dispatch, and
//! approval resolution.

pub mod aggregator;
pub mod approvals;
pub mod normalize;
pub mod reconcile;

pub use aggregator::{AggregatedQuote, AggregatedTrade, SwapAggregator};
pub use approvals::{ApprovalAction, ApprovalStatus};
