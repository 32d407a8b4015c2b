//! Reward contract port.

use std::future::Future;

use alloy_primitives::{Address, B256, U256};

/// Arguments of the contract's `claimReward` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCall {
    /// Account the reward is claimed for.
    pub account: Address,
    /// Claim period.
    pub period: u64,
    /// Amount being claimed.
    pub amount: U256,
    /// Allowlisted total for the account.
    pub allowed_amount: U256,
    /// Allowlisted per-day limit for the account.
    pub daily_limit: U256,
    /// Sibling path from the leaf up to the root.
    pub merkle_proof: Vec<B256>,
}

/// Minimal transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the mined transaction.
    pub tx_hash: B256,
}

/// Port for the reward contract.
///
/// Calls resolve once the transaction is mined.  Submission and retry policy
/// belong to the implementation.
pub trait RewardContract: Send + Sync {
    /// Claim a reward, proving the allowlist entry against the root published
    /// for `call.period`.
    fn claim_reward(
        &self,
        call: &ClaimCall,
    ) -> impl Future<Output = Result<TxReceipt, ContractError>> + Send;

    /// Publish the allowlist root for `period`, replacing any earlier root
    /// of that period.  Roots of other periods are untouched.
    fn update_merkle_root(
        &self,
        period: u64,
        root: B256,
    ) -> impl Future<Output = Result<TxReceipt, ContractError>> + Send;

    /// Whether claims are currently paused.
    fn is_paused(&self) -> impl Future<Output = Result<bool, ContractError>> + Send;

    /// Pause claims.
    fn pause(&self) -> impl Future<Output = Result<TxReceipt, ContractError>> + Send;

    /// Resume claims.
    fn unpause(&self) -> impl Future<Output = Result<TxReceipt, ContractError>> + Send;

    /// Grant `role` to `account`.
    fn grant_role(
        &self,
        role: B256,
        account: Address,
    ) -> impl Future<Output = Result<TxReceipt, ContractError>> + Send;

    /// Revoke `role` from `account`.
    fn revoke_role(
        &self,
        role: B256,
        account: Address,
    ) -> impl Future<Output = Result<TxReceipt, ContractError>> + Send;
}

/// Failures reported by a [`RewardContract`].
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// Claims or a second pause while paused.
    #[error("contract is paused")]
    Paused,

    /// Unpause while not paused.
    #[error("contract is not paused")]
    NotPaused,

    /// No root has been published for the claimed period.
    #[error("no merkle root has been set for period {0}")]
    NoRoot(u64),

    /// The proof does not lead to the period's root.
    #[error("invalid merkle proof")]
    InvalidProof,

    /// Any other revert, with its reason.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// Transport failure talking to the node.
    #[error("RPC error: {0}")]
    Rpc(String),
}
