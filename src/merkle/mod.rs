//! Balanced binary Merkle tree over ordered content
//!
//! The tree commits to an ordered list of [`Content`](crate::Content) items:
//! leaf hashes come from the items themselves, every internal node hashes
//! the concatenation of its children's hashes in left-then-right order, and
//! the root hash is the commitment. A [`MerkleProof`] carries the sibling
//! hashes along one leaf's path so a verifier holding only the root hash can
//! check membership.

mod node;
mod proof;
mod tree;

pub use proof::{MerkleProof, ProofStep, Side};
pub use tree::MerkleTree;
