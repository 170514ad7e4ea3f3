//! Hash-linked prefix trie over lowercase-letter keys
//!
//! Every node is content-addressed: its hash is derived from its branch
//! hashes and value, and all non-root nodes live in an external
//! [`NodeStore`] keyed by their own hash. The root hash is therefore a
//! binding commitment to the whole key/value set, and a proof is just the
//! minimal sub-store of nodes along one key's path.

mod node;
mod tree;

pub use node::{TrieNode, BRANCH_WIDTH};
pub use tree::{verify_proof, NodeStore, Trie, TrieProof};
