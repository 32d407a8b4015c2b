//! Errors from building and checking allowlist trees.

use thiserror::Error;

/// Errors from the allowlist tree.
///
/// All of these are deterministic for a given input and should not be
/// retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// An allowlist entry could not be constructed from its raw parts.
    #[error("invalid allowlist entry: {0}")]
    InvalidEntry(String),

    /// Tried to build a tree with no entries.
    #[error("allowlist is empty")]
    EmptyAllowlist,

    /// Proof requested for a leaf that is not in the tree.
    #[error("leaf index {index} out of range (tree has {num_leaves} leaves)")]
    IndexOutOfRange {
        /// Requested leaf index.
        index: usize,

        /// Number of leaves in the tree.
        num_leaves: usize,
    },

    /// Root computed from a proof did not match the expected root.
    #[error("proof does not reconstruct the expected root")]
    ProofMismatch,
}
