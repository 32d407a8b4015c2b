//! Merkle allowlist primitives.
//!
//! Builds a deterministic binary Merkle tree over a per-period allowlist of
//! `(address, allowedAmount, dailyLimit)` entries, derives the root that gets
//! published on-chain, and produces the inclusion proofs users present when
//! claiming.
//!
//! ```rust,ignore
//! use claimdrop_merkle::{AllowlistEntry, AllowlistSnapshot};
//!
//! let snapshot = AllowlistSnapshot::build(entries)?;
//! let root = snapshot.root();
//! let proof = snapshot.prove_inclusion(0)?;
//! snapshot.verify_entry(&snapshot.entries()[0], proof.cohashes())?;
//! ```
//!
//! # Modules
//!
//! - `entry`: [`AllowlistEntry`] and its 84-byte leaf encoding
//! - `hasher`: hash and hasher traits, Keccak-256 impl
//! - `tree`: sorted-pair binary Merkle tree with proofs
//! - `proof`: [`MerkleProof`] and the verification fold
//! - `snapshot`: [`AllowlistSnapshot`] tying entries to their tree

// stupid linter issue
#[cfg(test)]
use criterion as _;

pub mod entry;
pub mod error;
pub mod hasher;
pub mod proof;
pub mod snapshot;
pub mod tree;


pub use hasher::Keccak256Hasher;

// Common re-exports for ergonomic access at the crate root.
pub use entry::{AllowlistEntry, encode_leaf};
pub use error::MerkleError;
pub use hasher::{MerkleHash, MerkleHasher};
pub use proof::{MerkleProof, compute_root, verify};
pub use snapshot::{AllowlistSnapshot, Hash32, build_tree, verify_entry};
pub use tree::{MerkleTree, OddNodePolicy};
