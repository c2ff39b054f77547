//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the aggregation usecases
//! require from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `LiquiditySource`: one external swap-quoting service
//! - `Wallet`: allowance reads and approval submission on-chain

pub mod source;
pub mod wallet;

pub use source::LiquiditySource;
pub use wallet::{PendingApproval, TxOptions, Wallet};
