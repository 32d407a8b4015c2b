//! Claim handlers.
//!
//! Each handler takes a parsed request body, talks to the injected store and
//! contract, and returns a serializable response or a [`ClaimError`] the
//! outer layer maps to a status code.

use alloy_primitives::{Address, B256, U256, hex};
use claimdrop_merkle::{AllowlistEntry, AllowlistSnapshot, Keccak256Hasher, MerkleHasher};
use serde::Serialize;
use tracing::*;

use crate::config::ClaimsConfig;
use crate::errors::ClaimError;
use crate::ports::{ClaimCall, ClaimStore, NewClaim, RewardContract, StoreError};
use crate::registry::SnapshotRegistry;
use crate::types::{
    ClaimRequest, ClaimResponse, EntryInput, PrepareRequest, PrepareResponse, ProofResponse,
    RoleRequest, TxResponse, UpdateRootRequest, parse_hash, parse_proof,
};

/// Snapshot of service state for monitoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimServiceStatus {
    /// Periods with a registered snapshot, ascending.
    pub periods: Vec<u64>,
    /// Highest registered period.
    pub latest_period: Option<u64>,
    /// Root of the highest registered period.
    pub latest_root: Option<String>,
    /// Whether the contract is paused.
    pub paused: bool,
}

/// Claim handlers over a store and a contract.
///
/// All collaborators are passed in at construction; share the service
/// between request tasks behind an `Arc`.
#[derive(Debug)]
pub struct ClaimService<S, C> {
    config: ClaimsConfig,
    store: S,
    contract: C,
    snapshots: SnapshotRegistry,
}

impl<S: ClaimStore, C: RewardContract> ClaimService<S, C> {
    /// Service over `store` and `contract` with an empty snapshot registry.
    pub fn new(config: ClaimsConfig, store: S, contract: C) -> Self {
        Self {
            config,
            store,
            contract,
            snapshots: SnapshotRegistry::new(),
        }
    }

    /// Claim store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reward contract.
    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Snapshots registered by [`Self::prepare_merkle_data`].
    pub fn snapshots(&self) -> &SnapshotRegistry {
        &self.snapshots
    }

    /// Role id for the configured admin role name.
    pub fn admin_role(&self) -> B256 {
        B256::from(Keccak256Hasher::hash_leaf(self.config.admin_role.as_bytes()))
    }

    /// Claims a reward for the caller.
    ///
    /// The address comes from the body, or `header_address` (the
    /// `x-user-address` header) when the body has none.
    pub async fn claim_reward(
        &self,
        req: ClaimRequest,
        header_address: Option<&str>,
    ) -> Result<TxResponse, ClaimError> {
        let span = debug_span!("claim_reward", period = req.period);
        self.claim_reward_inner(req, header_address)
            .instrument(span)
            .await
    }

    async fn claim_reward_inner(
        &self,
        req: ClaimRequest,
        header_address: Option<&str>,
    ) -> Result<TxResponse, ClaimError> {
        let raw_address = req
            .address
            .as_deref()
            .or(header_address)
            .filter(|a| !a.trim().is_empty())
            .ok_or(ClaimError::MissingAddress)?;

        let entry = AllowlistEntry::parse(raw_address, &req.allowed_amount, &req.daily_limit)
            .map_err(|e| ClaimError::InvalidRequest(e.to_string()))?;
        let amount = parse_amount(&req.amount)?;
        let merkle_proof = parse_proof(&req.merkle_proof)?;
        let address = entry.address();
        let period = req.period;

        self.store.ensure_user(address).await?;

        if self.store.find_claim(address, period).await?.is_some() {
            debug!(%address, "claim already recorded");
            return Err(ClaimError::AlreadyClaimed { address, period });
        }

        if self.config.verify_before_submit {
            match self.snapshots.get(period).await {
                Some(snapshot) => {
                    let cohashes: Vec<[u8; 32]> = merkle_proof.iter().map(|h| h.0).collect();
                    snapshot.verify_entry(&entry, &cohashes)?;
                }
                None => debug!("no snapshot registered, leaving proof check to the contract"),
            }
        }

        let call = ClaimCall {
            account: address,
            period,
            amount,
            allowed_amount: entry.allowed_amount(),
            daily_limit: entry.daily_limit(),
            merkle_proof,
        };
        let receipt = self.contract.claim_reward(&call).await?;

        let new_claim = NewClaim {
            user_address: address,
            period,
            amount,
        };
        match self.store.insert_claim(new_claim).await {
            Ok(_) => {}
            Err(StoreError::UniqueViolation { address, period }) => {
                // Lost a race with a concurrent request after the contract
                // accepted ours.
                warn!(%address, period, tx = %receipt.tx_hash, "claim row already present");
                return Err(ClaimError::AlreadyClaimed { address, period });
            }
            Err(e) => return Err(e.into()),
        }

        info!(%address, %amount, tx = %receipt.tx_hash, "reward claimed");
        Ok(TxResponse::new(
            "Reward claimed successfully.",
            receipt.tx_hash,
        ))
    }

    /// Publishes a root for `req.period` on the contract.
    ///
    /// Only the contract learns about the root; proofs for the period come
    /// from [`Self::prepare_merkle_data`].
    pub async fn update_merkle_root(
        &self,
        req: UpdateRootRequest,
    ) -> Result<TxResponse, ClaimError> {
        let raw = req
            .merkle_root
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .ok_or(ClaimError::MissingRoot)?;
        let root = parse_hash("merkleRoot", raw)?;
        let period = req.period;

        let receipt = self
            .contract
            .update_merkle_root(period, root)
            .instrument(debug_span!("update_merkle_root", period, %root))
            .await?;
        info!(period, %root, "merkle root updated");
        Ok(TxResponse::new(
            "Merkle root updated successfully.",
            receipt.tx_hash,
        ))
    }

    /// Builds the snapshot for a period, publishes its root and keeps the
    /// tree for proof requests.
    pub async fn prepare_merkle_data(
        &self,
        req: PrepareRequest,
    ) -> Result<PrepareResponse, ClaimError> {
        let span = debug_span!("prepare_merkle_data", period = req.period);
        self.prepare_merkle_data_inner(req).instrument(span).await
    }

    async fn prepare_merkle_data_inner(
        &self,
        req: PrepareRequest,
    ) -> Result<PrepareResponse, ClaimError> {
        let entries = req
            .entries
            .iter()
            .map(EntryInput::to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        let snapshot = AllowlistSnapshot::build_with_policy(entries, self.config.odd_node_policy)?;
        let root = B256::from(snapshot.root());
        let count = snapshot.len();

        let receipt = self.contract.update_merkle_root(req.period, root).await?;
        if self.snapshots.insert(req.period, snapshot).await.is_some() {
            info!("superseded previous snapshot");
        }

        info!(%root, entries = count, "snapshot published");
        Ok(PrepareResponse {
            message: "Merkle root updated.".to_owned(),
            period: req.period,
            merkle_root: hex::encode_prefixed(root),
            entries: count,
            transaction_hash: hex::encode_prefixed(receipt.tx_hash),
        })
    }

    /// Returns the inclusion proof for `address` in the period's snapshot.
    pub async fn proof_for(&self, period: u64, address: &str) -> Result<ProofResponse, ClaimError> {
        let address = parse_account(address)?;
        let snapshot = self
            .snapshots
            .get(period)
            .await
            .ok_or(ClaimError::UnknownPeriod(period))?;

        let (entry, proof) = snapshot
            .proof_for_address(address)
            .ok_or(ClaimError::NotInAllowlist { address, period })?;
        let leaf = snapshot.leaf(proof.index() as usize)?;

        Ok(ProofResponse::new(
            period,
            &entry,
            leaf,
            &proof,
            snapshot.root(),
        ))
    }

    /// Claims the recorded history of `address`, ordered by period.
    pub async fn claim_history(&self, address: &str) -> Result<Vec<ClaimResponse>, ClaimError> {
        let address = parse_account(address)?;
        let claims = self.store.claims_for_user(address).await?;
        Ok(claims.iter().map(ClaimResponse::from).collect())
    }

    /// Pauses claims on the contract.
    pub async fn pause(&self) -> Result<TxResponse, ClaimError> {
        let receipt = self.contract.pause().await?;
        info!("contract paused");
        Ok(TxResponse::new("Contract paused.", receipt.tx_hash))
    }

    /// Resumes claims on the contract.
    pub async fn unpause(&self) -> Result<TxResponse, ClaimError> {
        let receipt = self.contract.unpause().await?;
        info!("contract unpaused");
        Ok(TxResponse::new("Contract unpaused.", receipt.tx_hash))
    }

    /// Grants the configured admin role to `req.account`.
    pub async fn grant_admin(&self, req: RoleRequest) -> Result<TxResponse, ClaimError> {
        let account = required_account(&req)?;
        let receipt = self.contract.grant_role(self.admin_role(), account).await?;
        info!(%account, "admin role granted");
        Ok(TxResponse::new("Admin role granted.", receipt.tx_hash))
    }

    /// Revokes the configured admin role from `req.account`.
    pub async fn revoke_admin(&self, req: RoleRequest) -> Result<TxResponse, ClaimError> {
        let account = required_account(&req)?;
        let receipt = self.contract.revoke_role(self.admin_role(), account).await?;
        info!(%account, "admin role revoked");
        Ok(TxResponse::new("Admin role revoked.", receipt.tx_hash))
    }

    /// Current registry and pause state.
    pub async fn status(&self) -> Result<ClaimServiceStatus, ClaimError> {
        let paused = self.contract.is_paused().await?;
        let latest = self.snapshots.latest().await;
        Ok(ClaimServiceStatus {
            periods: self.snapshots.periods().await,
            latest_period: latest.as_ref().map(|(p, _)| *p),
            latest_root: latest.map(|(_, s)| hex::encode_prefixed(s.root())),
            paused,
        })
    }
}

fn parse_amount(s: &str) -> Result<U256, ClaimError> {
    s.trim()
        .parse::<U256>()
        .map_err(|e| ClaimError::InvalidRequest(format!("amount {s:?}: {e}")))
}

fn parse_account(s: &str) -> Result<Address, ClaimError> {
    claimdrop_merkle::entry::parse_address(s).map_err(|e| ClaimError::InvalidRequest(e.to_string()))
}

fn required_account(req: &RoleRequest) -> Result<Address, ClaimError> {
    let raw = req
        .account
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or(ClaimError::MissingAccount)?;
    parse_account(raw)
}
