//! Quote and trade request/result shapes.
//!
//! Amounts are atomic integers (`U256`, the token's smallest unit);
//! nothing in these types ever passes through floating point. All
//! addresses here are in canonical space — translation to each
//! source's own sentinel convention happens in the dispatcher, around
//! the adapters.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A request for the best-available rate, without an executable payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Token being sold.
    pub source_token: Address,
    /// Token being bought.
    pub destination_token: Address,
    /// Amount sold, in the source token's atomic units.
    pub source_amount: U256,
}

/// A request for a rate plus an executable transaction template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Token being sold.
    pub source_token: Address,
    /// Token being bought.
    pub destination_token: Address,
    /// Amount sold, in the source token's atomic units.
    pub source_amount: U256,
    /// Address that will sign and submit the trade.
    pub user_address: Address,
    /// Uniform slippage tolerance in basis points; each adapter converts
    /// this to its own convention (percent, fraction, or limit amount).
    pub slippage_bps: u32,
}

impl TradeRequest {
    /// The quote-shaped part of this request.
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            source_token: self.source_token,
            destination_token: self.destination_token,
            source_amount: self.source_amount,
        }
    }
}

/// A successful rate from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub source_token: Address,
    pub destination_token: Address,
    pub source_amount: U256,
    /// Amount bought, in the destination token's atomic units.
    pub destination_amount: U256,
}

/// A successful rate plus the unsigned transaction template executing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub source_token: Address,
    pub destination_token: Address,
    pub source_amount: U256,
    pub destination_amount: U256,
    /// Sender of the unsigned transaction (the user).
    pub from: Address,
    /// Target contract of the unsigned transaction.
    pub to: Address,
    /// Native value attached to the transaction.
    pub value: U256,
    /// Opaque calldata built by the source.
    pub data: Bytes,
}

impl Trade {
    /// The quote-shaped part of this trade.
    pub fn quote(&self) -> Quote {
        Quote {
            source_token: self.source_token,
            destination_token: self.destination_token,
            source_amount: self.source_amount,
            destination_amount: self.destination_amount,
        }
    }
}
