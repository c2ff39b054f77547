//! ERC-20 Approval Resolution
//!
//! Every successful trade answers one more question before it can be
//! submitted: does the trading contract already hold a sufficient
//! allowance on the source token? Native-asset sales never need one.
//! Allowance lookups run concurrently and a failed lookup degrades
//! only its own entry, not the batch.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use anyhow::Result;
use futures_util::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::domain::token::NATIVE_SENTINEL;
use crate::domain::{SourceError, Trade, TradeRequest};
use crate::ports::{LiquiditySource, PendingApproval, TxOptions, Wallet};

/// Approval posture of one trade.
#[derive(Debug, Serialize)]
pub enum ApprovalStatus {
    /// Allowance already covers the sale amount, or the sale is native.
    NotRequired,
    /// An approval must be submitted first; the action carries
    /// everything needed to do so.
    Required(ApprovalAction),
    /// The allowance lookup itself failed; the trade is still valid
    /// but its approval posture is unknown.
    CheckFailed(String),
}

/// A deferred `approve` call bound to the wallet that will submit it.
#[derive(Clone, Serialize)]
pub struct ApprovalAction {
    /// ERC-20 token whose allowance is insufficient.
    pub token: Address,
    /// Contract that will be granted the allowance.
    pub spender: Address,
    #[serde(skip)]
    wallet: Arc<dyn Wallet>,
}

impl ApprovalAction {
    /// Submit an unlimited approval and return its pending handle.
    pub async fn submit(&self, options: TxOptions) -> Result<PendingApproval> {
        self.wallet
            .approve(self.token, self.spender, U256::MAX, options)
            .await
    }
}

impl fmt::Debug for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApprovalAction")
            .field("token", &self.token)
            .field("spender", &self.spender)
            .finish_non_exhaustive()
    }
}

/// Resolve the approval posture of one source's trade.
async fn resolve_one(
    source: &dyn LiquiditySource,
    trade: &Trade,
    request: &TradeRequest,
    wallet: Arc<dyn Wallet>,
) -> ApprovalStatus {
    if request.source_token == NATIVE_SENTINEL {
        return ApprovalStatus::NotRequired;
    }

    // ParaSwap builds a bespoke target per trade, so its spender is the
    // trade's own `to`; the others publish a fixed proxy contract.
    let spender = source.approval_spender().unwrap_or(trade.to);

    match wallet
        .allowance(request.source_token, request.user_address, spender)
        .await
    {
        Ok(allowance) if allowance >= request.source_amount => ApprovalStatus::NotRequired,
        Ok(_) => ApprovalStatus::Required(ApprovalAction {
            token: request.source_token,
            spender,
            wallet,
        }),
        Err(e) => {
            warn!(source = source.id(), error = %e, "Allowance check failed");
            ApprovalStatus::CheckFailed(e.to_string())
        }
    }
}

/// Resolve approval postures for a batch of trade results, one slot
/// per source in registration order. Failed trades get no posture.
pub async fn resolve(
    sources: &[Arc<dyn LiquiditySource>],
    trades: &[Result<Trade, SourceError>],
    request: &TradeRequest,
    wallet: &Arc<dyn Wallet>,
) -> Vec<Option<ApprovalStatus>> {
    let checks = sources.iter().zip(trades).map(|(source, trade)| {
        let wallet = Arc::clone(wallet);
        async move {
            match trade {
                Ok(trade) => Some(resolve_one(source.as_ref(), trade, request, wallet).await),
                Err(_) => None,
            }
        }
    });
    join_all(checks).await
}
