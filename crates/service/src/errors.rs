use alloy_primitives::Address;
use claimdrop_merkle::MerkleError;
use thiserror::Error;

use crate::ports::{ContractError, StoreError};

/// Errors originating in the claim handlers.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Neither the body nor the `x-user-address` header named a claimant.
    #[error("user address is required")]
    MissingAddress,

    /// Root update without a root.
    #[error("merkle root is required")]
    MissingRoot,

    /// Role change without an account.
    #[error("account address is required")]
    MissingAccount,

    /// A request field could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The store already holds a claim for this user and period.
    #[error("reward already claimed for period {period} by {address}")]
    AlreadyClaimed {
        /// Claimant.
        address: Address,

        /// Claim period.
        period: u64,
    },

    /// No snapshot has been prepared for the period.
    #[error("no allowlist snapshot for period {0}")]
    UnknownPeriod(u64),

    /// The address is not part of the period's snapshot.
    #[error("{address} is not in the allowlist for period {period}")]
    NotInAllowlist {
        /// Looked-up address.
        address: Address,

        /// Claim period.
        period: u64,
    },

    /// Allowlist tree error.
    #[error("merkle: {0}")]
    Merkle(#[from] MerkleError),

    /// Persistence error.
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// Contract call error.
    #[error("contract: {0}")]
    Contract(#[from] ContractError),
}

impl ClaimError {
    /// HTTP status class an outer layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingAddress
            | Self::MissingRoot
            | Self::MissingAccount
            | Self::InvalidRequest(_)
            | Self::AlreadyClaimed { .. } => 400,
            Self::UnknownPeriod(_) | Self::NotInAllowlist { .. } => 404,
            Self::Merkle(
                MerkleError::InvalidEntry(_)
                | MerkleError::EmptyAllowlist
                | MerkleError::ProofMismatch,
            ) => 400,
            Self::Merkle(MerkleError::IndexOutOfRange { .. }) => 500,
            Self::Store(_) | Self::Contract(_) => 500,
        }
    }
}
