//! Allowlist snapshots: the entries of one period together with their tree.

use alloy_primitives::Address;

use crate::Keccak256Hasher;
use crate::entry::AllowlistEntry;
use crate::error::MerkleError;
use crate::proof::MerkleProof;
use crate::tree::{MerkleTree, OddNodePolicy};

/// 32-byte hash used throughout the allowlist tree.
pub type Hash32 = [u8; 32];

/// Builds the Keccak-256 allowlist tree for `entries`, in input order.
pub fn build_tree(entries: &[AllowlistEntry]) -> Result<MerkleTree<Hash32>, MerkleError> {
    build_tree_with_policy(entries, OddNodePolicy::default())
}

/// Like [`build_tree`], with an explicit odd-node policy.
pub fn build_tree_with_policy(
    entries: &[AllowlistEntry],
    policy: OddNodePolicy,
) -> Result<MerkleTree<Hash32>, MerkleError> {
    let leaves: Vec<Hash32> = entries
        .iter()
        .map(AllowlistEntry::leaf_hash::<Keccak256Hasher>)
        .collect();
    MerkleTree::from_leaves_with_policy::<Keccak256Hasher>(leaves, policy)
}

/// Immutable allowlist for one period with its tree retained for proving.
///
/// If the same address appears more than once, lookups by address resolve to
/// the first occurrence.
#[derive(Clone, Debug)]
pub struct AllowlistSnapshot {
    entries: Vec<AllowlistEntry>,
    tree: MerkleTree<Hash32>,
}

impl AllowlistSnapshot {
    /// Builds a snapshot with the default odd-node policy.
    pub fn build(entries: Vec<AllowlistEntry>) -> Result<Self, MerkleError> {
        Self::build_with_policy(entries, OddNodePolicy::default())
    }

    /// Builds a snapshot with an explicit odd-node policy.
    pub fn build_with_policy(
        entries: Vec<AllowlistEntry>,
        policy: OddNodePolicy,
    ) -> Result<Self, MerkleError> {
        let tree = build_tree_with_policy(&entries, policy)?;
        Ok(Self { entries, tree })
    }

    /// Root to publish for this snapshot.
    pub fn root(&self) -> Hash32 {
        *self.tree.root()
    }

    /// Entries in leaf order.
    pub fn entries(&self) -> &[AllowlistEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, since empty snapshots can't be built.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Underlying tree.
    pub fn tree(&self) -> &MerkleTree<Hash32> {
        &self.tree
    }

    /// Leaf hash at `index`.
    pub fn leaf(&self, index: usize) -> Result<Hash32, MerkleError> {
        self.tree
            .leaves()
            .get(index)
            .copied()
            .ok_or(MerkleError::IndexOutOfRange {
                index,
                num_leaves: self.len(),
            })
    }

    /// Index of the first entry for `address`.
    pub fn index_of(&self, address: Address) -> Option<usize> {
        self.entries.iter().position(|e| e.address() == address)
    }

    /// Index of the first entry equal to `entry`.
    pub fn index_of_entry(&self, entry: &AllowlistEntry) -> Option<usize> {
        self.tree.position(&entry.leaf_hash::<Keccak256Hasher>())
    }

    /// Inclusion proof for the entry at `index`.
    pub fn prove_inclusion(&self, index: usize) -> Result<MerkleProof<Hash32>, MerkleError> {
        self.tree.gen_proof(index)
    }

    /// Inclusion proof for the first entry of `address`, with that entry.
    pub fn proof_for_address(
        &self,
        address: Address,
    ) -> Option<(AllowlistEntry, MerkleProof<Hash32>)> {
        let index = self.index_of(address)?;
        let proof = self.tree.gen_proof(index).ok()?;
        Some((self.entries[index], proof))
    }

    /// Checks that `cohashes` proves `entry` against this snapshot's root.
    pub fn verify_entry(
        &self,
        entry: &AllowlistEntry,
        cohashes: &[Hash32],
    ) -> Result<(), MerkleError> {
        verify_entry(entry, cohashes, &self.root())
    }
}

/// Checks that `cohashes` proves `entry` against `root`.
pub fn verify_entry(
    entry: &AllowlistEntry,
    cohashes: &[Hash32],
    root: &Hash32,
) -> Result<(), MerkleError> {
    let leaf = entry.leaf_hash::<Keccak256Hasher>();
    if crate::proof::verify::<Keccak256Hasher>(&leaf, cohashes, root) {
        Ok(())
    } else {
        Err(MerkleError::ProofMismatch)
    }
}
