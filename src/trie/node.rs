//! Trie node type and hashing

use crate::{Error, Hash, Result};
use digest::Digest;
use serde::{Deserialize, Serialize};

/// Branching factor: one slot per letter `a`..=`z`
///
/// This is a hard structural limit of the key alphabet, not a tunable.
pub const BRANCH_WIDTH: usize = 26;

/// Map a key byte to its branch slot, rejecting anything outside the
/// alphabet
pub(crate) fn branch_index(byte: u8) -> Result<usize> {
    if byte.is_ascii_lowercase() {
        Ok((byte - b'a') as usize)
    } else {
        Err(Error::InvalidKey(byte as char))
    }
}

/// A node in the authenticated trie
///
/// Branch slots hold the hashes of child nodes stored in the external
/// [`NodeStore`](super::NodeStore), never child nodes themselves. An empty
/// value string means no key terminates at this node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNode {
    branch: [Option<Hash>; BRANCH_WIDTH],
    value: String,
    /// Cached digest; valid only after a hash computation
    hash: Option<Hash>,
}

impl TrieNode {
    /// Create an empty node: no children, no value
    pub fn new() -> Self {
        TrieNode::default()
    }

    /// The value terminating at this node; empty means none
    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// The child hash in a branch slot, if any
    pub fn branch(&self, slot: usize) -> Option<&Hash> {
        self.branch[slot].as_ref()
    }

    pub(crate) fn set_branch(&mut self, slot: usize, hash: Hash) {
        self.branch[slot] = Some(hash);
    }

    /// Iterate the occupied branch slots in slot order
    pub fn branches(&self) -> impl Iterator<Item = &Hash> {
        self.branch.iter().filter_map(|slot| slot.as_ref())
    }

    /// The digest recorded by the last hash computation
    pub fn cached_hash(&self) -> Option<&Hash> {
        self.hash.as_ref()
    }

    /// Compute this node's hash and refresh the cache
    ///
    /// The digest covers every present branch hash in slot order followed by
    /// the value bytes, so it is derivable from this node's fields plus its
    /// descendants' stored hashes alone.
    pub fn compute_hash<D: Digest>(&mut self) -> Hash {
        let mut hasher = D::new();
        for child in self.branches() {
            hasher.update(child.as_bytes());
        }
        hasher.update(self.value.as_bytes());
        let hash = Hash::from_bytes(hasher.finalize().to_vec());
        self.hash = Some(hash.clone());
        hash
    }
}
