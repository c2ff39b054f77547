//! Canonical token identity.
//!
//! The whole aggregation layer keys tokens by their 20-byte contract
//! address. Addresses are stored as binary `alloy::primitives::Address`,
//! so checksum-vs-lowercase differences disappear at the parse boundary.
//! The chain's native asset has no contract; it is represented by the
//! all-zero sentinel in canonical space, while individual sources use
//! their own placeholder (most commonly the all-`e` address).

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Canonical native-asset sentinel used everywhere outside the adapters.
pub const NATIVE_SENTINEL: Address = Address::ZERO;

/// The all-`e` native-asset placeholder shared by most aggregation services.
pub const ETH_PLACEHOLDER: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// One tradable token as reported by a source, or as exposed in the
/// canonical catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Contract address; identity key across the aggregation layer.
    pub address: Address,
    /// Ticker symbol as reported by the source.
    pub symbol: String,
    /// Number of decimals in the token's atomic unit.
    pub decimals: u8,
}

impl TokenInfo {
    /// Build the synthetic catalog entry for the chain's native asset.
    pub fn native(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address: NATIVE_SENTINEL,
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Look up a token by address in a source catalog.
pub fn find_by_address(tokens: &[TokenInfo], address: Address) -> Option<&TokenInfo> {
    tokens.iter().find(|t| t.address == address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_entry_uses_canonical_sentinel() {
        let eth = TokenInfo::native("ETH", 18);
        assert_eq!(eth.address, NATIVE_SENTINEL);
        assert_eq!(eth.symbol, "ETH");
        assert_eq!(eth.decimals, 18);
    }

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(NATIVE_SENTINEL, ETH_PLACEHOLDER);
    }

    #[test]
    fn mixed_case_addresses_parse_to_same_identity() {
        let lower: Address = "0x6b175474e89094c44da98b954eedeac495271d0f"
            .parse()
            .unwrap();
        let checksummed: Address = "0x6B175474E89094C44Da98b954EedeAC495271d0F"
            .parse()
            .unwrap();
        assert_eq!(lower, checksummed);
    }
}
