//! Authenticated trie operations

use super::node::{branch_index, TrieNode};
use crate::store::MemoryStore;
use crate::{Error, Hash, Result};
use digest::Digest;
use sha2::Sha256;
use std::marker::PhantomData;

/// The external store backing a trie: nodes keyed by their own hash
pub type NodeStore = MemoryStore<TrieNode>;

/// A 26-way prefix trie whose nodes are hash-addressed store entries
///
/// Only the root node is held in memory; every other node lives in the
/// caller's [`NodeStore`] under its own hash. Nodes are immutable once
/// hashed: an update re-hashes every node along the key's path and stores
/// each one under its new hash, leaving old entries in place so subtrees
/// shared with earlier roots are never orphaned.
pub struct Trie<D = Sha256> {
    root: TrieNode,
    _digest: PhantomData<D>,
}

impl<D: Digest> Trie<D> {
    /// Create an empty trie
    pub fn new() -> Self {
        Trie {
            root: TrieNode::new(),
            _digest: PhantomData,
        }
    }

    /// The root digest — the trie's commitment; `None` before the first put
    pub fn root_hash(&self) -> Option<&Hash> {
        self.root.cached_hash()
    }

    /// Look up the value stored under a key
    ///
    /// Returns `None` both when the key's path is absent and when the path
    /// exists but no value terminates there. Store misses along a present
    /// path are also treated as absence; only key bytes outside `a`..=`z`
    /// are errors.
    pub fn get(&self, key: &str, db: &NodeStore) -> Result<Option<String>> {
        let bytes = key.as_bytes();
        let mut node = self.root.clone();
        for (i, &byte) in bytes.iter().enumerate() {
            let slot = branch_index(byte)?;
            let child_hash = match node.branch(slot) {
                Some(hash) => hash.clone(),
                None => return Ok(None),
            };
            if !db.has(&child_hash) {
                return Ok(None);
            }
            let child = db.get(&child_hash)?;
            if i == bytes.len() - 1 {
                if child.value().is_empty() {
                    return Ok(None);
                }
                return Ok(Some(child.value().to_string()));
            }
            node = child;
        }
        Ok(None)
    }

    /// Insert or update a key's value and return the new root hash
    ///
    /// Every node along the path is re-hashed and stored under its fresh
    /// hash on the way back up, so the returned hash commits to the whole
    /// updated key/value set.
    pub fn put(&mut self, key: &str, value: &str, db: &mut NodeStore) -> Result<Hash> {
        let (root, hash) = update_node::<D>(self.root.clone(), key.as_bytes(), value, db)?;
        self.root = root;
        Ok(hash)
    }

    /// Recompute the hash of every reachable node from the stored structure
    /// and compare against the recorded root hash
    ///
    /// Store misses for referenced children propagate as
    /// [`Error::NotFound`]. A trie that has never been written verifies
    /// trivially: there is no commitment to contradict.
    pub fn verify(&self, db: &NodeStore) -> Result<bool> {
        let expected = match self.root.cached_hash() {
            Some(hash) => hash,
            None => return Ok(true),
        };
        let recomputed = recompute_node::<D>(&self.root, db)?;
        Ok(recomputed == *expected)
    }

    /// Extract the minimal sub-store proving one key against the current
    /// root
    ///
    /// Copies every node along the key's path into a fresh store. Returns
    /// `None` for the empty key, or when any expected branch or store entry
    /// is missing along the way — no proof exists for an absent path.
    pub fn prove(&self, key: &str, db: &NodeStore) -> Result<Option<TrieProof>> {
        if key.is_empty() {
            return Ok(None);
        }

        let mut store = NodeStore::new();
        let mut node = self.root.clone();
        let mut remaining = key.as_bytes();
        loop {
            let hash = match node.cached_hash() {
                Some(hash) => hash.clone(),
                None => return Ok(None),
            };
            store.put(&hash, node.clone());

            if remaining.is_empty() {
                let present = !node.value().is_empty();
                return Ok(Some(TrieProof { store, present }));
            }

            let slot = branch_index(remaining[0])?;
            remaining = &remaining[1..];
            let child_hash = match node.branch(slot) {
                Some(hash) => hash.clone(),
                None => return Ok(None),
            };
            if !db.has(&child_hash) {
                return Ok(None);
            }
            node = db.get(&child_hash)?;
        }
    }
}

impl<D: Digest> Default for Trie<D> {
    fn default() -> Self {
        Trie::new()
    }
}

/// A proof sub-store extracted for one key
pub struct TrieProof {
    store: NodeStore,
    present: bool,
}

impl TrieProof {
    /// Whether the proven key terminates at a non-empty value
    pub fn key_present(&self) -> bool {
        self.present
    }

    /// The proof-relevant nodes, keyed by hash
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Replay this proof against a known root hash
    pub fn verify(&self, root_hash: &Hash, key: &str) -> Result<String> {
        verify_proof(root_hash, key, &self.store)
    }
}

/// Verify a proof sub-store against a root hash, returning the value stored
/// under the key
///
/// This is the stand-alone verifier: it needs only the root hash, the key,
/// and the proof store, and never recomputes a digest — it checks that the
/// root hash resolves through the proof's own hash links. Every hash along
/// the key's path must name a node in the proof store
/// ([`Error::ProofNodeMissing`] otherwise); an absent branch slot behaves as
/// an empty target that fails the next lookup. A proof extracted for one
/// root cannot satisfy a different (for example post-update) root, since
/// that root's hash is not among its keys.
pub fn verify_proof(root_hash: &Hash, key: &str, proof: &NodeStore) -> Result<String> {
    let bytes = key.as_bytes();
    let mut target = root_hash.clone();
    for (i, &byte) in bytes.iter().enumerate() {
        let node = proof_node(proof, &target, i)?;
        let slot = branch_index(byte)?;
        target = node.branch(slot).cloned().unwrap_or_default();
    }
    let node = proof_node(proof, &target, bytes.len())?;
    Ok(node.value().to_string())
}

fn proof_node(proof: &NodeStore, target: &Hash, index: usize) -> Result<TrieNode> {
    if !proof.has(target) {
        return Err(Error::ProofNodeMissing {
            index,
            hash: target.to_hex(),
        });
    }
    proof.get(target)
}

/// Copy-on-write descent for `put`: set the value at the end of the key,
/// re-hash and store every node on the way back up, and hand the new hash
/// to the parent
fn update_node<D: Digest>(
    mut node: TrieNode,
    key: &[u8],
    value: &str,
    db: &mut NodeStore,
) -> Result<(TrieNode, Hash)> {
    if key.is_empty() {
        node.set_value(value);
    } else {
        let slot = branch_index(key[0])?;
        let child = match node.branch(slot) {
            Some(hash) if db.has(hash) => db.get(hash)?,
            _ => TrieNode::new(),
        };
        let (_, child_hash) = update_node::<D>(child, &key[1..], value, db)?;
        node.set_branch(slot, child_hash);
    }
    let hash = node.compute_hash::<D>();
    db.put(&hash, node.clone());
    Ok((node, hash))
}

/// Recursively recompute a node's digest from the stored structure
fn recompute_node<D: Digest>(node: &TrieNode, db: &NodeStore) -> Result<Hash> {
    let mut hasher = D::new();
    for child_hash in node.branches() {
        let child = db.get(child_hash)?;
        let recomputed = recompute_node::<D>(&child, db)?;
        hasher.update(recomputed.as_bytes());
    }
    hasher.update(node.value().as_bytes());
    Ok(Hash::from_bytes(hasher.finalize().to_vec()))
}
