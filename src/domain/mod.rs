//! Domain layer - Pure swap-aggregation types and math.
//!
//! Canonical token identity, quote/trade request and result shapes,
//! atomic/display amount conversion, and comparative ranking.
//! No I/O allowed here (hexagonal architecture inner ring); everything
//! is synchronous and testable in isolation.

pub mod amounts;
pub mod error;
pub mod ranking;
pub mod swap;
pub mod token;

// Re-export core types for convenience
pub use error::{AmountError, SourceError};
pub use swap::{Quote, QuoteRequest, Trade, TradeRequest};
pub use token::{TokenInfo, ETH_PLACEHOLDER, NATIVE_SENTINEL};
