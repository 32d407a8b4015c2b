//! Binary Merkle tree over sorted pairs.
//!
//! Construct from leaves, generate inclusion proofs, and verify those proofs.
//! Parents are always `hash(min(a, b) || max(a, b))`, so proofs carry no
//! left/right information.
use crate::error::MerkleError;
use crate::hasher::{MerkleHash, MerkleHasher};
use crate::proof::MerkleProof;

/// What to do with the last node of a layer that has an odd number of nodes.
///
/// Building and proving must agree with whatever the on-chain verifier was
/// written against, so the policy is recorded in the tree.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OddNodePolicy {
    /// Pair the node with itself: parent is `hash(n || n)`.
    #[default]
    Duplicate,

    /// Carry the node up to the next layer unchanged.
    Promote,
}

/// Binary Merkle tree keeping every layer, leaves first and root last.
#[derive(Clone, Debug)]
pub struct MerkleTree<H: MerkleHash> {
    /// `layers[0]` are the leaves in input order, the last layer is `[root]`.
    layers: Vec<Vec<H>>,
    policy: OddNodePolicy,
}

impl<H: MerkleHash> MerkleTree<H> {
    /// Builds a tree from leaf hashes using [`OddNodePolicy::Duplicate`].
    pub fn from_leaves<MH>(leaves: impl Into<Vec<H>>) -> Result<Self, MerkleError>
    where
        MH: MerkleHasher<Hash = H>,
    {
        Self::from_leaves_with_policy::<MH>(leaves, OddNodePolicy::default())
    }

    /// Builds a tree from leaf hashes with an explicit odd-node policy.
    ///
    /// Returns `Err(MerkleError::EmptyAllowlist)` if there are no leaves.
    pub fn from_leaves_with_policy<MH>(
        leaves: impl Into<Vec<H>>,
        policy: OddNodePolicy,
    ) -> Result<Self, MerkleError>
    where
        MH: MerkleHasher<Hash = H>,
    {
        let leaves = leaves.into();
        if leaves.is_empty() {
            return Err(MerkleError::EmptyAllowlist);
        }

        let mut layers = vec![leaves];
        while let Some(level) = layers.last().filter(|l| l.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    &[a, b] => MH::hash_sorted_pair(a, b),
                    &[a] => match policy {
                        OddNodePolicy::Duplicate => MH::hash_sorted_pair(a, a),
                        OddNodePolicy::Promote => a,
                    },
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }

        Ok(Self { layers, policy })
    }

    /// Returns the number of leaves in the tree.
    pub fn num_leaves(&self) -> usize {
        self.layers[0].len()
    }

    /// Returns a slice of the leaf nodes.
    pub fn leaves(&self) -> &[H] {
        &self.layers[0]
    }

    /// Returns all layers, leaves first.
    pub fn layers(&self) -> &[Vec<H>] {
        &self.layers
    }

    /// Returns the number of hashing levels between the leaves and the root.
    ///
    /// A single-leaf tree has height 0.
    pub fn height(&self) -> usize {
        self.layers.len() - 1
    }

    /// Returns the odd-node policy the tree was built with.
    pub fn policy(&self) -> OddNodePolicy {
        self.policy
    }

    /// Returns the tree root.
    ///
    /// Construction rejects empty input, so a root is always present.
    pub fn root(&self) -> &H {
        self.layers
            .last()
            .and_then(|l| l.first())
            .expect("MerkleTree: root must exist")
    }

    /// Returns the index of the first leaf equal to `leaf`.
    pub fn position(&self, leaf: &H) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    /// Generates an inclusion proof for the leaf at `index`.
    pub fn gen_proof(&self, index: usize) -> Result<MerkleProof<H>, MerkleError> {
        let num_leaves = self.num_leaves();
        if index >= num_leaves {
            return Err(MerkleError::IndexOutOfRange { index, num_leaves });
        }

        let mut local_idx = index;
        let mut path = Vec::with_capacity(self.height());

        for level in &self.layers[..self.height()] {
            // sibling local index: flip lowest bit
            let sib_local = local_idx ^ 1;
            match level.get(sib_local) {
                Some(sibling) => path.push(*sibling),
                None => match self.policy {
                    OddNodePolicy::Duplicate => path.push(level[local_idx]),
                    OddNodePolicy::Promote => {}
                },
            }

            // move up one level
            local_idx >>= 1;
        }

        Ok(MerkleProof::from_cohashes(path, index as u64))
    }

    /// Verifies a `proof` for `leaf` against this tree's root.
    pub fn verify_proof<MH>(&self, proof: &MerkleProof<H>, leaf: &H) -> bool
    where
        MH: MerkleHasher<Hash = H>,
    {
        proof.verify_with_root::<MH>(self.root(), leaf)
    }
}
