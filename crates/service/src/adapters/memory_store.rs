//! In-memory claim store.

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::Address;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::ports::{ClaimRecord, ClaimStore, NewClaim, StoreError, UserRecord};

/// In-memory implementation of `ClaimStore` for tests and local runs.
///
/// Mirrors the relational schema: claims reference an existing user and are
/// unique on `(user_address, period)`.
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<Address, UserRecord>,
    claims: Vec<ClaimRecord>,
    by_user_period: HashMap<(Address, u64), usize>,
}

impl InMemoryClaimStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded claims.
    pub async fn claim_count(&self) -> usize {
        self.inner.lock().await.claims.len()
    }
}

impl ClaimStore for InMemoryClaimStore {
    async fn ensure_user(&self, address: Address) -> Result<UserRecord, StoreError> {
        let mut tables = self.inner.lock().await;
        let user = tables
            .users
            .entry(address)
            .or_insert_with(|| UserRecord {
                address,
                created_at: Utc::now(),
            });
        Ok(user.clone())
    }

    async fn find_claim(
        &self,
        address: Address,
        period: u64,
    ) -> Result<Option<ClaimRecord>, StoreError> {
        let tables = self.inner.lock().await;
        Ok(tables
            .by_user_period
            .get(&(address, period))
            .map(|&i| tables.claims[i].clone()))
    }

    async fn insert_claim(&self, claim: NewClaim) -> Result<ClaimRecord, StoreError> {
        let mut tables = self.inner.lock().await;
        if !tables.users.contains_key(&claim.user_address) {
            return Err(StoreError::UnknownUser(claim.user_address));
        }

        let key = (claim.user_address, claim.period);
        if tables.by_user_period.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                address: claim.user_address,
                period: claim.period,
            });
        }

        let record = ClaimRecord {
            id: tables.claims.len() as u64 + 1,
            user_address: claim.user_address,
            period: claim.period,
            amount: claim.amount,
            claimed_at: Utc::now(),
        };
        let pos = tables.claims.len();
        tables.claims.push(record.clone());
        tables.by_user_period.insert(key, pos);
        Ok(record)
    }

    async fn claims_for_user(&self, address: Address) -> Result<Vec<ClaimRecord>, StoreError> {
        let tables = self.inner.lock().await;
        let mut claims: Vec<_> = tables
            .claims
            .iter()
            .filter(|c| c.user_address == address)
            .cloned()
            .collect();
        claims.sort_by_key(|c| c.period);
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    fn new_claim(byte: u8, period: u64) -> NewClaim {
        NewClaim {
            user_address: Address::repeat_byte(byte),
            period,
            amount: U256::from(10u64),
        }
    }

    #[tokio::test]
    async fn unique_on_user_and_period() {
        let store = InMemoryClaimStore::new();
        store.ensure_user(Address::repeat_byte(1)).await.unwrap();

        let first = store.insert_claim(new_claim(1, 1)).await.unwrap();
        assert_eq!(first.id, 1);

        let err = store.insert_claim(new_claim(1, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { period: 1, .. }));

        store.insert_claim(new_claim(1, 2)).await.unwrap();
        assert_eq!(store.claim_count().await, 2);

        let found = store
            .find_claim(Address::repeat_byte(1), 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, first);
    }

    #[tokio::test]
    async fn claims_require_user() {
        let store = InMemoryClaimStore::new();
        let err = store.insert_claim(new_claim(2, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(_)));
    }

    #[tokio::test]
    async fn ensure_user_is_idempotent() {
        let store = InMemoryClaimStore::new();
        let a = store.ensure_user(Address::repeat_byte(3)).await.unwrap();
        let b = store.ensure_user(Address::repeat_byte(3)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn claims_for_user_sorted_by_period() {
        let store = InMemoryClaimStore::new();
        store.ensure_user(Address::repeat_byte(4)).await.unwrap();
        store.ensure_user(Address::repeat_byte(5)).await.unwrap();
        store.insert_claim(new_claim(4, 9)).await.unwrap();
        store.insert_claim(new_claim(5, 1)).await.unwrap();
        store.insert_claim(new_claim(4, 2)).await.unwrap();

        let periods: Vec<_> = store
            .claims_for_user(Address::repeat_byte(4))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.period)
            .collect();
        assert_eq!(periods, vec![2, 9]);
    }
}
