//! Adapters Layer - Port Implementations
//!
//! - `sources`: the five `LiquiditySource` implementations, one per
//!   external aggregation service, plus their shared HTTP plumbing
//! - `chain`: the alloy-backed `Wallet` implementation

pub mod chain;
pub mod sources;
