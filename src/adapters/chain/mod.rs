//! Chain Adapters - alloy-rs backed `Wallet` implementation.

pub mod provider;
pub mod wallet;

pub use provider::EthereumProvider;
pub use wallet::EvmWallet;
