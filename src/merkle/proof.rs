//! Compact inclusion proofs
//!
//! A proof carries only the sibling hashes along one leaf's path to the
//! root, so a verifier holding the root hash can check membership without
//! the tree. Serialization of proofs is left to the embedding system; the
//! serde derives are the open seam for that.

use crate::{Content, Hash, Result};
use digest::Digest;
use serde::{Deserialize, Serialize};

/// Which side of its parent a recorded sibling sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The sibling is the left child; the proven node is on the right
    Left,
    /// The sibling is the right child; the proven node is on the left
    Right,
}

/// One level of an inclusion proof
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// The sibling's stored hash at this level
    pub sibling: Hash,
    /// Side the sibling sits on, relative to the path being proven
    pub side: Side,
}

/// An inclusion proof: sibling hashes with side flags, leaf-to-root order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    steps: Vec<ProofStep>,
}

impl MerkleProof {
    pub(crate) fn new(steps: Vec<ProofStep>) -> Self {
        MerkleProof { steps }
    }

    /// The recorded path, leaf-to-root
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// Number of levels in the proof
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A single-leaf tree proves itself with an empty path
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replay the proof from a leaf hash and accept iff it reproduces the
    /// root hash
    ///
    /// At each step the running digest is concatenated with the sibling on
    /// the recorded side and re-hashed, reproducing exactly the
    /// left-then-right order used during construction. Requires no access
    /// to the tree; `D` must be the strategy the tree was built with.
    pub fn verify<D: Digest>(&self, leaf_hash: &Hash, root_hash: &Hash) -> bool {
        let mut acc = leaf_hash.clone();
        for step in &self.steps {
            acc = match step.side {
                Side::Right => Hash::combine::<D>(&acc, &step.sibling),
                Side::Left => Hash::combine::<D>(&step.sibling, &acc),
            };
        }
        acc == *root_hash
    }

    /// Replay the proof from the claimed leaf content itself
    pub fn verify_content<C: Content, D: Digest>(
        &self,
        content: &C,
        root_hash: &Hash,
    ) -> Result<bool> {
        Ok(self.verify::<D>(&content.calculate_hash()?, root_hash))
    }
}
