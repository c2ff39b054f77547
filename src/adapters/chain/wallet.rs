//! ERC-20 Allowance Wallet - `Wallet` Port Implementation
//!
//! Reads `allowance(owner, spender)` via `eth_call` with hand-encoded
//! calldata and submits `approve(spender, amount)` through the RPC
//! endpoint's own signer. The endpoint must manage the sending key;
//! key custody is outside this crate.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::ports::wallet::{PendingApproval, TxOptions, Wallet};

use super::provider::EthereumProvider;

/// Poll interval while waiting for a confirmation.
const CONFIRMATION_POLL: Duration = Duration::from_secs(2);
/// Give up waiting for a confirmation after this many polls.
const CONFIRMATION_ATTEMPTS: u32 = 60;

/// `Wallet` implementation over a shared alloy provider.
pub struct EvmWallet {
    /// Shared Ethereum RPC provider.
    provider: Arc<EthereumProvider>,
    /// Account the RPC endpoint signs approvals with.
    owner: Address,
}

impl EvmWallet {
    pub fn new(provider: Arc<EthereumProvider>, owner: Address) -> Self {
        Self { provider, owner }
    }

    /// ABI-encode a two-address call like `allowance(address,address)`.
    fn encode_two_addresses(signature: &[u8], first: Address, second: Address) -> Bytes {
        let selector = &keccak256(signature)[..4];
        let mut calldata = Vec::with_capacity(68);
        calldata.extend_from_slice(selector);
        calldata.extend_from_slice(&left_pad(first));
        calldata.extend_from_slice(&left_pad(second));
        Bytes::from(calldata)
    }

    /// ABI-encode `approve(address,uint256)`.
    fn encode_approve(spender: Address, amount: U256) -> Bytes {
        let selector = &keccak256(b"approve(address,uint256)")[..4];
        let mut calldata = Vec::with_capacity(68);
        calldata.extend_from_slice(selector);
        calldata.extend_from_slice(&left_pad(spender));
        calldata.extend_from_slice(&amount.to_be_bytes::<32>());
        Bytes::from(calldata)
    }
}

/// Left-pad an address to a 32-byte ABI word.
fn left_pad(address: Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..].copy_from_slice(address.as_slice());
    padded
}

#[async_trait]
impl Wallet for EvmWallet {
    #[instrument(skip(self))]
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        let calldata =
            Self::encode_two_addresses(b"allowance(address,address)", owner, spender);
        let tx = TransactionRequest::default().to(token).input(calldata.into());

        let result = self
            .provider
            .inner()
            .call(&tx)
            .await
            .context("Allowance query failed")?;

        Ok(U256::from_be_slice(&result))
    }

    #[instrument(skip(self, options))]
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        options: TxOptions,
    ) -> Result<PendingApproval> {
        let calldata = Self::encode_approve(spender, amount);
        let mut tx = TransactionRequest::default().to(token).input(calldata.into());
        tx.from = Some(self.owner);
        tx.gas = options.gas_limit;
        tx.max_fee_per_gas = options.max_fee_per_gas;
        tx.max_priority_fee_per_gas = options.max_priority_fee_per_gas;

        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .context("Approval submission failed")?;
        let tx_hash = *pending.tx_hash();

        info!(
            token = %token,
            spender = %spender,
            tx_hash = %tx_hash,
            "Approval submitted"
        );

        Ok(PendingApproval { tx_hash })
    }

    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<()> {
        let inner = self.provider.inner();
        for _ in 0..CONFIRMATION_ATTEMPTS {
            let receipt = inner
                .get_transaction_receipt(tx_hash)
                .await
                .context("Receipt query failed")?;
            if receipt.is_some() {
                return Ok(());
            }
            sleep(CONFIRMATION_POLL).await;
        }
        anyhow::bail!("transaction {tx_hash} not confirmed in time");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowance_calldata_layout() {
        let owner = Address::repeat_byte(0xaa);
        let spender = Address::repeat_byte(0xbb);
        let calldata =
            EvmWallet::encode_two_addresses(b"allowance(address,address)", owner, spender);

        assert_eq!(calldata.len(), 68);
        // ERC-20 allowance selector.
        assert_eq!(&calldata[..4], &[0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(&calldata[4..16], &[0u8; 12]);
        assert_eq!(&calldata[16..36], owner.as_slice());
        assert_eq!(&calldata[48..68], spender.as_slice());
    }

    #[test]
    fn approve_calldata_layout() {
        let spender = Address::repeat_byte(0xcc);
        let calldata = EvmWallet::encode_approve(spender, U256::MAX);

        assert_eq!(calldata.len(), 68);
        // ERC-20 approve selector.
        assert_eq!(&calldata[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(&calldata[16..36], spender.as_slice());
        assert_eq!(&calldata[36..68], &[0xffu8; 32]);
    }
}
