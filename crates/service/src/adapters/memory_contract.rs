//! In-memory reward contract.

use std::collections::{BTreeMap, HashMap, HashSet};

use alloy_primitives::{Address, B256, U256};
use claimdrop_merkle::{AllowlistEntry, Keccak256Hasher, MerkleHasher, verify_entry};
use tokio::sync::Mutex;
use tracing::debug;

use crate::ports::{ClaimCall, ContractError, RewardContract, TxReceipt};

/// In-memory stand-in for the reward contract.
///
/// Reproduces the checks the deployed contract makes: claims are refused
/// while paused, the allowlist proof is verified against the root published
/// for the claimed period with the sorted-pair rule, the amount may not exceed the allowance, and
/// each account claims once per period.
#[derive(Debug, Default)]
pub struct InMemoryRewardContract {
    state: Mutex<ContractState>,
}

#[derive(Debug, Default)]
struct ContractState {
    paused: bool,
    roots: BTreeMap<u64, B256>,
    roles: HashMap<B256, HashSet<Address>>,
    claimed: HashMap<(Address, u64), U256>,
    nonce: u64,
}

impl ContractState {
    fn next_receipt(&mut self) -> TxReceipt {
        self.nonce += 1;
        let tx_hash = Keccak256Hasher::hash_leaf(&self.nonce.to_be_bytes());
        TxReceipt {
            tx_hash: B256::from(tx_hash),
        }
    }
}

impl InMemoryRewardContract {
    /// Unpaused contract with no roots and no roles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root published for `period`.
    pub async fn merkle_root(&self, period: u64) -> Option<B256> {
        self.state.lock().await.roots.get(&period).copied()
    }

    /// Whether `account` holds `role`.
    pub async fn has_role(&self, role: B256, account: Address) -> bool {
        self.state
            .lock()
            .await
            .roles
            .get(&role)
            .is_some_and(|members| members.contains(&account))
    }

    /// Amount paid out to `account` for `period`, if claimed.
    pub async fn claimed_amount(&self, account: Address, period: u64) -> Option<U256> {
        self.state
            .lock()
            .await
            .claimed
            .get(&(account, period))
            .copied()
    }
}

impl RewardContract for InMemoryRewardContract {
    async fn claim_reward(&self, call: &ClaimCall) -> Result<TxReceipt, ContractError> {
        let mut state = self.state.lock().await;
        if state.paused {
            return Err(ContractError::Paused);
        }

        let root = *state
            .roots
            .get(&call.period)
            .ok_or(ContractError::NoRoot(call.period))?;
        let entry = AllowlistEntry::new(call.account, call.allowed_amount, call.daily_limit);
        let cohashes: Vec<[u8; 32]> = call.merkle_proof.iter().map(|h| h.0).collect();
        verify_entry(&entry, &cohashes, &root.0).map_err(|_| ContractError::InvalidProof)?;

        if call.amount > call.allowed_amount {
            return Err(ContractError::Reverted("amount exceeds allowance".into()));
        }

        let key = (call.account, call.period);
        if state.claimed.contains_key(&key) {
            return Err(ContractError::Reverted("already claimed".into()));
        }
        state.claimed.insert(key, call.amount);

        debug!(account = %call.account, period = call.period, "reward claimed");
        Ok(state.next_receipt())
    }

    async fn update_merkle_root(
        &self,
        period: u64,
        root: B256,
    ) -> Result<TxReceipt, ContractError> {
        let mut state = self.state.lock().await;
        state.roots.insert(period, root);
        debug!(period, %root, "merkle root set");
        Ok(state.next_receipt())
    }

    async fn is_paused(&self) -> Result<bool, ContractError> {
        Ok(self.state.lock().await.paused)
    }

    async fn pause(&self) -> Result<TxReceipt, ContractError> {
        let mut state = self.state.lock().await;
        if state.paused {
            return Err(ContractError::Paused);
        }
        state.paused = true;
        Ok(state.next_receipt())
    }

    async fn unpause(&self) -> Result<TxReceipt, ContractError> {
        let mut state = self.state.lock().await;
        if !state.paused {
            return Err(ContractError::NotPaused);
        }
        state.paused = false;
        Ok(state.next_receipt())
    }

    async fn grant_role(&self, role: B256, account: Address) -> Result<TxReceipt, ContractError> {
        let mut state = self.state.lock().await;
        state.roles.entry(role).or_default().insert(account);
        Ok(state.next_receipt())
    }

    async fn revoke_role(&self, role: B256, account: Address) -> Result<TxReceipt, ContractError> {
        let mut state = self.state.lock().await;
        if let Some(members) = state.roles.get_mut(&role) {
            members.remove(&account);
        }
        Ok(state.next_receipt())
    }
}

#[cfg(test)]
mod tests {
    use claimdrop_merkle::AllowlistSnapshot;

    use super::*;

    fn snapshot() -> AllowlistSnapshot {
        AllowlistSnapshot::build(vec![
            AllowlistEntry::new(Address::repeat_byte(1), U256::from(50u64), U256::from(5u64)),
            AllowlistEntry::new(Address::repeat_byte(2), U256::from(80u64), U256::from(8u64)),
        ])
        .unwrap()
    }

    fn call_for(snap: &AllowlistSnapshot, index: usize, amount: u64) -> ClaimCall {
        let entry = snap.entries()[index];
        let proof = snap.prove_inclusion(index).unwrap();
        ClaimCall {
            account: entry.address(),
            period: 1,
            amount: U256::from(amount),
            allowed_amount: entry.allowed_amount(),
            daily_limit: entry.daily_limit(),
            merkle_proof: proof.cohashes().iter().map(|h| B256::from(*h)).collect(),
        }
    }

    #[tokio::test]
    async fn claim_checks_root_and_proof() {
        let contract = InMemoryRewardContract::new();
        let snap = snapshot();
        let call = call_for(&snap, 0, 10);

        assert!(matches!(
            contract.claim_reward(&call).await,
            Err(ContractError::NoRoot(1))
        ));

        contract
            .update_merkle_root(1, B256::from(snap.root()))
            .await
            .unwrap();
        contract.claim_reward(&call).await.unwrap();
        assert_eq!(
            contract.claimed_amount(call.account, 1).await,
            Some(U256::from(10u64))
        );

        let again = contract.claim_reward(&call).await.unwrap_err();
        assert!(matches!(again, ContractError::Reverted(_)));

        let mut forged = call_for(&snap, 1, 10);
        forged.allowed_amount = U256::from(1_000u64);
        assert!(matches!(
            contract.claim_reward(&forged).await,
            Err(ContractError::InvalidProof)
        ));

        let greedy = call_for(&snap, 1, 81);
        assert!(matches!(
            contract.claim_reward(&greedy).await,
            Err(ContractError::Reverted(_))
        ));
    }

    #[tokio::test]
    async fn pause_blocks_claims() {
        let contract = InMemoryRewardContract::new();
        let snap = snapshot();
        contract
            .update_merkle_root(1, B256::from(snap.root()))
            .await
            .unwrap();

        assert!(!contract.is_paused().await.unwrap());
        contract.pause().await.unwrap();
        assert!(contract.is_paused().await.unwrap());
        assert!(matches!(
            contract.claim_reward(&call_for(&snap, 0, 1)).await,
            Err(ContractError::Paused)
        ));

        contract.unpause().await.unwrap();
        assert!(matches!(
            contract.unpause().await,
            Err(ContractError::NotPaused)
        ));
        contract.claim_reward(&call_for(&snap, 0, 1)).await.unwrap();
    }

    #[tokio::test]
    async fn roots_are_kept_per_period() {
        let contract = InMemoryRewardContract::new();
        let first = snapshot();
        let second = AllowlistSnapshot::build(vec![AllowlistEntry::new(
            Address::repeat_byte(1),
            U256::from(500u64),
            U256::from(50u64),
        )])
        .unwrap();

        contract
            .update_merkle_root(1, B256::from(first.root()))
            .await
            .unwrap();
        contract
            .update_merkle_root(2, B256::from(second.root()))
            .await
            .unwrap();
        assert_eq!(contract.merkle_root(1).await, Some(B256::from(first.root())));

        // period 1 proof still checks against the period 1 root
        contract.claim_reward(&call_for(&first, 0, 10)).await.unwrap();

        let mut wrong_period = call_for(&first, 1, 10);
        wrong_period.period = 2;
        assert!(matches!(
            contract.claim_reward(&wrong_period).await,
            Err(ContractError::InvalidProof)
        ));

        let mut unknown = call_for(&first, 1, 10);
        unknown.period = 3;
        assert!(matches!(
            contract.claim_reward(&unknown).await,
            Err(ContractError::NoRoot(3))
        ));
    }

    #[tokio::test]
    async fn roles_and_receipts() {
        let contract = InMemoryRewardContract::new();
        let role = B256::repeat_byte(0xaa);
        let who = Address::repeat_byte(9);

        let r1 = contract.grant_role(role, who).await.unwrap();
        assert!(contract.has_role(role, who).await);
        let r2 = contract.revoke_role(role, who).await.unwrap();
        assert!(!contract.has_role(role, who).await);
        assert_ne!(r1.tx_hash, r2.tx_hash);
    }
}
