//! Token Catalog Reconciliation
//!
//! Merges the per-source token catalogs into one canonical catalog.
//! Sources disagree on coverage and on how they spell the native
//! asset, so the merge takes the union by address with the first-seen
//! record winning, and replaces every source-reported native entry
//! with a single synthetic one at the front.

use std::collections::HashSet;

use alloy::primitives::Address;

use crate::domain::token::{TokenInfo, NATIVE_SENTINEL};

/// Merge canonical-space catalogs, in source registration order, into
/// one deduplicated catalog headed by the native asset.
///
/// Catalog entries must already be translated to canonical space; any
/// entry carrying the native sentinel address or the native symbol is
/// dropped in favor of the synthetic `native` record.
pub fn reconcile(native: &TokenInfo, catalogs: &[&[TokenInfo]]) -> Vec<TokenInfo> {
    let mut seen: HashSet<Address> = HashSet::new();
    let mut merged = Vec::with_capacity(1 + catalogs.iter().map(|c| c.len()).sum::<usize>());

    seen.insert(native.address);
    merged.push(native.clone());

    for catalog in catalogs {
        for token in *catalog {
            if token.address == NATIVE_SENTINEL {
                continue;
            }
            if token.symbol.eq_ignore_ascii_case(&native.symbol) {
                continue;
            }
            if seen.insert(token.address) {
                merged.push(token.clone());
            }
        }
    }

    merged
}
