//! Native Address Normalization
//!
//! Callers always use the zero address for the chain's native asset.
//! Each upstream API has its own placeholder for it, so requests are
//! rewritten into the source's address space on the way out and
//! responses rewritten back into the canonical space on the way in.

use alloy::primitives::Address;

use crate::domain::token::NATIVE_SENTINEL;
use crate::domain::{Quote, QuoteRequest, Trade, TradeRequest};

/// Rewrite a canonical address into a source's address space.
pub fn to_source_space(address: Address, placeholder: Address) -> Address {
    if address == NATIVE_SENTINEL {
        placeholder
    } else {
        address
    }
}

/// Rewrite a source-space address back into the canonical space.
pub fn to_canonical_space(address: Address, placeholder: Address) -> Address {
    if address == placeholder {
        NATIVE_SENTINEL
    } else {
        address
    }
}

/// Quote request with both token legs rewritten for a source.
pub fn quote_request_for_source(request: &QuoteRequest, placeholder: Address) -> QuoteRequest {
    QuoteRequest {
        source_token: to_source_space(request.source_token, placeholder),
        destination_token: to_source_space(request.destination_token, placeholder),
        ..request.clone()
    }
}

/// Trade request with both token legs rewritten for a source.
pub fn trade_request_for_source(request: &TradeRequest, placeholder: Address) -> TradeRequest {
    TradeRequest {
        source_token: to_source_space(request.source_token, placeholder),
        destination_token: to_source_space(request.destination_token, placeholder),
        ..request.clone()
    }
}

/// Quote with both token legs rewritten back to canonical form.
pub fn quote_to_canonical(quote: Quote, placeholder: Address) -> Quote {
    Quote {
        source_token: to_canonical_space(quote.source_token, placeholder),
        destination_token: to_canonical_space(quote.destination_token, placeholder),
        ..quote
    }
}

/// Trade with both token legs rewritten back to canonical form.
pub fn trade_to_canonical(trade: Trade, placeholder: Address) -> Trade {
    Trade {
        source_token: to_canonical_space(trade.source_token, placeholder),
        destination_token: to_canonical_space(trade.destination_token, placeholder),
        ..trade
    }
}
