//! Claim persistence port.

use std::future::Future;

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Primary key.
    pub address: Address,
    /// When the row was first inserted.
    pub created_at: DateTime<Utc>,
}

/// A row of the `claims` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRecord {
    /// Store-assigned id.
    pub id: u64,
    /// References `users.address`.
    pub user_address: Address,
    /// Claim period.
    pub period: u64,
    /// Amount paid out.
    pub amount: U256,
    /// Insert time.
    pub claimed_at: DateTime<Utc>,
}

/// Claim to be recorded.  The store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClaim {
    /// Claimant, must have a user row.
    pub user_address: Address,
    /// Claim period.
    pub period: u64,
    /// Amount paid out.
    pub amount: U256,
}

/// Port for claim persistence.
///
/// The `(user_address, period)` uniqueness constraint is the authority on
/// whether a reward was already claimed.  `insert_claim` must fail with
/// [`StoreError::UniqueViolation`] rather than overwrite.
///
/// Implementations:
/// - `InMemoryClaimStore` (for tests and local runs)
pub trait ClaimStore: Send + Sync {
    /// Return the user row for `address`, creating it if missing.
    fn ensure_user(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Look up the claim for a user and period.
    fn find_claim(
        &self,
        address: Address,
        period: u64,
    ) -> impl Future<Output = Result<Option<ClaimRecord>, StoreError>> + Send;

    /// Record a claim.  The user row must already exist.
    fn insert_claim(
        &self,
        claim: NewClaim,
    ) -> impl Future<Output = Result<ClaimRecord, StoreError>> + Send;

    /// All claims of a user, ordered by period.
    fn claims_for_user(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Vec<ClaimRecord>, StoreError>> + Send;
}

/// Failures reported by a [`ClaimStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A claim for the user and period already exists.
    #[error("claim for {address} in period {period} already exists")]
    UniqueViolation {
        /// Claimant.
        address: Address,
        /// Claim period.
        period: u64,
    },

    /// Claim insert without a user row.
    #[error("unknown user: {0}")]
    UnknownUser(Address),

    /// Backend failure.
    #[error("internal store error: {0}")]
    Internal(String),
}
