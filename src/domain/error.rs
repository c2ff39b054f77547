//! Error taxonomy for per-source results.
//!
//! Every failure reaching the caller travels as data on the result
//! envelope, never as a panic or early return across the batch. The
//! only batch-aborting failures are programming errors in the
//! dispatcher itself.

use alloy::primitives::Address;
use serde::Serialize;
use thiserror::Error;

/// Per-source failure, surfaced as data on an aggregated result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SourceError {
    /// Network, HTTP status, parse, or timeout failure reaching the source.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Requested token is absent from the source's own catalog; detected
    /// before any network call.
    #[error("unsupported asset {0}")]
    UnsupportedAsset(Address),

    /// Allowance could not be read for this trade result.
    #[error("allowance check failed: {0}")]
    AllowanceCheckFailed(String),

    /// The source's catalog fetch failed at startup; the source is
    /// unusable for the process lifetime.
    #[error("token catalog fetch failed: {0}")]
    ConstructionFailed(String),
}

/// Failure converting between atomic and display amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount exceeds the 96-bit mantissa of `rust_decimal`.
    #[error("amount {0} out of range for decimal conversion")]
    OutOfRange(String),

    /// Token decimals exceed the maximum supported scale.
    #[error("unsupported decimal scale {0}")]
    UnsupportedScale(u8),
}

impl From<AmountError> for SourceError {
    fn from(err: AmountError) -> Self {
        Self::Unavailable(err.to_string())
    }
}
