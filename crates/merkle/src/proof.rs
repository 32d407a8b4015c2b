//! Inclusion proofs and the sorted-pair verification rule.

use crate::error::MerkleError;
use crate::hasher::{MerkleHash, MerkleHasher};

/// Inclusion proof for a leaf in an allowlist tree.
///
/// Siblings are ordered from the leaf level up to just below the root.  The
/// index is informational: verification only needs the cohashes, since every
/// parent is the hash of a sorted pair.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleProof<H>
where
    H: MerkleHash,
{
    /// Sibling hashes required for proof.
    cohashes: Vec<H>,

    /// Index of the leaf this proof was generated for.
    index: u64,
}

impl<H: MerkleHash> MerkleProof<H> {
    /// Constructs a new instance from the path.
    pub fn from_cohashes(cohashes: Vec<H>, index: u64) -> Self {
        Self { cohashes, index }
    }

    /// Returns the cohash path for this proof.
    pub fn cohashes(&self) -> &[H] {
        &self.cohashes
    }

    /// Returns the index this proof is for.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Discards the index and returns the cohash path.
    pub fn into_cohashes(self) -> Vec<H> {
        self.cohashes
    }

    /// Computes the root obtained by applying this proof to `leaf`.
    pub fn compute_root<MH>(&self, leaf: &H) -> H
    where
        MH: MerkleHasher<Hash = H>,
    {
        compute_root::<MH>(leaf, &self.cohashes)
    }

    /// Verifies this proof for `leaf` against the expected `root`.
    pub fn verify_with_root<MH>(&self, root: &H, leaf: &H) -> bool
    where
        MH: MerkleHasher<Hash = H>,
    {
        verify::<MH>(leaf, &self.cohashes, root)
    }

    /// Like [`Self::verify_with_root`], but reports a mismatch as an error.
    pub fn verify_strict<MH>(&self, root: &H, leaf: &H) -> Result<(), MerkleError>
    where
        MH: MerkleHasher<Hash = H>,
    {
        if self.verify_with_root::<MH>(root, leaf) {
            Ok(())
        } else {
            Err(MerkleError::ProofMismatch)
        }
    }
}

/// Folds `acc = hash(sort(acc, sibling))` over `cohashes`, starting at `leaf`.
pub fn compute_root<MH: MerkleHasher>(leaf: &MH::Hash, cohashes: &[MH::Hash]) -> MH::Hash {
    cohashes
        .iter()
        .fold(*leaf, |acc, co| MH::hash_sorted_pair(acc, *co))
}

/// Checks that `cohashes` takes `leaf` to `root`.
///
/// This is the same computation the on-chain verifier performs.
pub fn verify<MH: MerkleHasher>(leaf: &MH::Hash, cohashes: &[MH::Hash], root: &MH::Hash) -> bool {
    let computed = compute_root::<MH>(leaf, cohashes);
    <MH::Hash as MerkleHash>::eq_ct(&computed, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keccak256Hasher;

    type H = [u8; 32];

    #[test]
    fn empty_proof_is_identity() {
        let leaf = Keccak256Hasher::hash_leaf(b"only");
        let proof = MerkleProof::<H>::from_cohashes(Vec::new(), 0);
        assert_eq!(proof.compute_root::<Keccak256Hasher>(&leaf), leaf);
        assert!(proof.verify_with_root::<Keccak256Hasher>(&leaf, &leaf));
    }

    #[test]
    fn fold_uses_sorted_pairs() {
        let a = Keccak256Hasher::hash_leaf(b"a");
        let b = Keccak256Hasher::hash_leaf(b"b");
        let c = Keccak256Hasher::hash_leaf(b"c");
        let ab = Keccak256Hasher::hash_sorted_pair(a, b);
        let root = Keccak256Hasher::hash_sorted_pair(ab, c);

        let proof = MerkleProof::<H>::from_cohashes(vec![b, c], 0);
        assert!(proof.verify_with_root::<Keccak256Hasher>(&root, &a));

        // Siblings carry no side information, so swapping the leaf with its
        // first sibling still verifies.
        let swapped = MerkleProof::<H>::from_cohashes(vec![a, c], 1);
        assert!(swapped.verify_with_root::<Keccak256Hasher>(&root, &b));
    }

    #[test]
    fn strict_reports_mismatch() {
        let a = Keccak256Hasher::hash_leaf(b"a");
        let b = Keccak256Hasher::hash_leaf(b"b");
        let proof = MerkleProof::<H>::from_cohashes(vec![b], 0);
        assert_eq!(
            proof.verify_strict::<Keccak256Hasher>(&[0u8; 32], &a),
            Err(MerkleError::ProofMismatch)
        );
        let root = Keccak256Hasher::hash_sorted_pair(a, b);
        assert_eq!(proof.verify_strict::<Keccak256Hasher>(&root, &a), Ok(()));
    }
}
