//! Hashing primitives for the allowlist tree: hash types and hashing strategies.

use digest::Digest;
use sha3::Keccak256;

/// Hash wrapper trait used by the tree.
///
/// Hashes must be totally ordered by their byte value, since internal nodes
/// are computed over sorted pairs.
pub trait MerkleHash: Copy + Clone + Eq + Ord + 'static {
    /// Checks if two hashes are equal, attempting to do it in constant time.
    fn eq_ct(a: &Self, b: &Self) -> bool;
}

impl<const LEN: usize> MerkleHash for [u8; LEN] {
    fn eq_ct(a: &Self, b: &Self) -> bool {
        // Best-effort constant time.  LLVM is free to short-circuit this, but
        // the root we compare against is public anyway.
        let mut acc: u32 = 0;
        for i in 0..LEN {
            acc += (a[i] ^ b[i]) as u32;
        }

        acc == 0
    }
}

/// Generic merkle hashing trait.
pub trait MerkleHasher {
    /// Hash value.
    type Hash: MerkleHash;

    /// Hashes an arbitrary message as leaf data to compute a leaf hash.
    fn hash_leaf(buf: &[u8]) -> Self::Hash;

    /// Hashes a node's left and right children to compute the node's hash.
    fn hash_node(left: Self::Hash, right: Self::Hash) -> Self::Hash;

    /// Hashes two sibling nodes after ordering them ascending by byte value.
    ///
    /// This is the only way parents are computed in the allowlist tree, so a
    /// verifier never needs to know which side a sibling sits on.
    fn hash_sorted_pair(a: Self::Hash, b: Self::Hash) -> Self::Hash {
        if a <= b {
            Self::hash_node(a, b)
        } else {
            Self::hash_node(b, a)
        }
    }
}

/// Merkle hasher for arbitrary digest impl that does not prefix node/leaf
/// inputs.
///
/// Leaves are `H(leaf)` and nodes are `H(left || right)`, which is what the
/// Solidity `MerkleProof` verifier computes.  The digest runs exactly once per
/// call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DigestMerkleHasher<D: Digest, const N: usize>(std::marker::PhantomData<D>);

impl<D: Digest, const N: usize> MerkleHasher for DigestMerkleHasher<D, N> {
    type Hash = [u8; N];

    fn hash_leaf(buf: &[u8]) -> Self::Hash {
        let mut context = D::new();
        context.update(buf);

        let result = context.finalize();
        result
            .as_ref()
            .try_into()
            .expect("digest output length mismatch")
    }

    fn hash_node(left: Self::Hash, right: Self::Hash) -> Self::Hash {
        let mut context = D::new();
        context.update(left);
        context.update(right);

        let result = context.finalize();
        result
            .as_ref()
            .try_into()
            .expect("digest output length mismatch")
    }
}

/// Keccak-256 hasher, as used by the on-chain allowlist verifier.
pub type Keccak256Hasher = DigestMerkleHasher<Keccak256, 32>;
