//! Wallet Port - On-chain Allowance Interface
//!
//! The aggregation core needs exactly two things from the chain: read
//! the allowance a user has granted a spender for a token, and submit
//! an approval raising it. Submission is one opaque call returning a
//! pending handle; confirmation tracking, retries, and signing live
//! behind the implementation.

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

/// Optional overrides for the approval transaction.
#[derive(Debug, Clone, Default)]
pub struct TxOptions {
    /// Gas limit override.
    pub gas_limit: Option<u64>,
    /// EIP-1559 max fee per gas, in wei.
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee per gas, in wei.
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Handle for a submitted, not-yet-confirmed approval transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingApproval {
    /// Hash of the submitted transaction.
    pub tx_hash: B256,
}

/// Trait for on-chain allowance reads and approval submission.
#[async_trait]
pub trait Wallet: Send + Sync + 'static {
    /// Read `allowance(owner, spender)` on the given ERC-20 token.
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> anyhow::Result<U256>;

    /// Submit `approve(spender, amount)` on the given ERC-20 token and
    /// return the pending transaction handle.
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        options: TxOptions,
    ) -> anyhow::Result<PendingApproval>;

    /// Wait until the given transaction is confirmed.
    async fn wait_for_confirmation(&self, tx_hash: B256) -> anyhow::Result<()>;
}
