//! Merkle tree construction and verification

use super::node::{MerkleNode, NodeId, NodeKind};
use super::proof::{MerkleProof, ProofStep, Side};
use crate::{Content, Error, Hash, Result};
use digest::Digest;
use sha2::Sha256;
use std::marker::PhantomData;

/// A binary hash tree committing to an ordered list of content items
///
/// Leaf hashes come from [`Content::calculate_hash`]; every internal node
/// hashes `left || right` with the strategy `D`. Levels with an odd count
/// are evened out by duplicating the last node (at the leaf level) or
/// pairing the trailing node with itself (at intermediate levels), so the
/// tree is strictly binary throughout.
///
/// The tree is immutable after [`build`](MerkleTree::build) apart from the
/// full [`rebuild`](MerkleTree::rebuild); there is no incremental update.
pub struct MerkleTree<C, D = Sha256> {
    /// Arena of nodes; children and parents are indices into this vec
    nodes: Vec<MerkleNode<C>>,
    /// Ordered leaf ids, padding duplicate included
    leaves: Vec<NodeId>,
    root: NodeId,
    /// Root digest recorded at the time of the last build
    root_hash: Hash,
    _digest: PhantomData<D>,
}

impl<C: Content, D: Digest> MerkleTree<C, D> {
    /// Build a tree over a non-empty ordered list of content
    pub fn build(contents: &[C]) -> Result<Self> {
        let (nodes, leaves, root) = assemble::<C, D>(contents)?;
        let root_hash = nodes[root].hash.clone();
        Ok(MerkleTree {
            nodes,
            leaves,
            root,
            root_hash,
            _digest: PhantomData,
        })
    }

    /// The root digest — the tree's commitment
    pub fn root_hash(&self) -> &Hash {
        &self.root_hash
    }

    /// Number of leaves, including the padding duplicate if one was added
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Check whether a content item is one of the tree's leaves
    pub fn contains(&self, content: &C) -> Result<bool> {
        Ok(self.find_leaf(content)?.is_some())
    }

    /// Recompute every node's hash bottom-up from the leaf contents,
    /// checking each against its stored digest, and compare the recomputed
    /// root against the recorded root hash
    ///
    /// Recomputed values are what propagate upward; stored hashes are only
    /// ever compared, never trusted, so a forged cached hash anywhere in the
    /// structure is detected.
    pub fn verify(&self) -> Result<bool> {
        match self.recompute(self.root)? {
            Some(recomputed) => Ok(recomputed == self.root_hash),
            None => Ok(false),
        }
    }

    /// Check that one content item's path to the root is internally
    /// consistent with the stored ancestor hashes
    ///
    /// Returns false when the content is not a leaf. Cheaper than
    /// [`verify`](MerkleTree::verify), but only inspects the one path: each
    /// ancestor is re-hashed from its children's shallow hashes and compared
    /// to its stored digest.
    pub fn verify_content(&self, content: &C) -> Result<bool> {
        let leaf = match self.find_leaf(content)? {
            Some(leaf) => leaf,
            None => return Ok(false),
        };

        let mut current = leaf;
        while let Some(parent) = self.nodes[current].parent {
            if let NodeKind::Internal { left, right } = &self.nodes[parent].kind {
                let left_hash = self.shallow_hash(*left)?;
                let right_hash = self.shallow_hash(*right)?;
                if Hash::combine::<D>(&left_hash, &right_hash) != self.nodes[parent].hash {
                    return Ok(false);
                }
            }
            current = parent;
        }
        Ok(true)
    }

    /// Extract the inclusion proof for a content item
    ///
    /// Returns `None` when the content is not a leaf. The proof records, for
    /// each ancestor from the leaf up, the sibling's stored hash and which
    /// side the sibling sits on.
    pub fn prove(&self, content: &C) -> Result<Option<MerkleProof>> {
        let mut current = match self.find_leaf(content)? {
            Some(leaf) => leaf,
            None => return Ok(None),
        };

        let mut steps = Vec::new();
        while let Some(parent) = self.nodes[current].parent {
            if let NodeKind::Internal { left, right } = &self.nodes[parent].kind {
                if *left == current {
                    steps.push(ProofStep {
                        sibling: self.nodes[*right].hash.clone(),
                        side: Side::Right,
                    });
                } else {
                    steps.push(ProofStep {
                        sibling: self.nodes[*left].hash.clone(),
                        side: Side::Left,
                    });
                }
            }
            current = parent;
        }
        Ok(Some(MerkleProof::new(steps)))
    }

    /// Discard the node graph and rebuild it from the current leaf contents
    ///
    /// Use after any out-of-band mutation of a leaf's content to restore a
    /// consistent hash graph. Padding duplicates are not collected, so the
    /// logical leaf set is preserved across repeated rebuilds.
    pub fn rebuild(&mut self) -> Result<()> {
        let mut contents = Vec::with_capacity(self.leaves.len());
        for &leaf in &self.leaves {
            if self.nodes[leaf].is_duplicate() {
                continue;
            }
            if let NodeKind::Leaf { content, .. } = &self.nodes[leaf].kind {
                contents.push(content.clone());
            }
        }
        self.rebuild_with(&contents)
    }

    /// Discard the node graph and rebuild it over a new content list
    pub fn rebuild_with(&mut self, contents: &[C]) -> Result<()> {
        let (nodes, leaves, root) = assemble::<C, D>(contents)?;
        self.root_hash = nodes[root].hash.clone();
        self.nodes = nodes;
        self.leaves = leaves;
        self.root = root;
        Ok(())
    }

    // === Internal helpers ===

    /// First leaf whose content equals the given item
    fn find_leaf(&self, content: &C) -> Result<Option<NodeId>> {
        for &leaf in &self.leaves {
            if let NodeKind::Leaf { content: c, .. } = &self.nodes[leaf].kind {
                if c.equals(content)? {
                    return Ok(Some(leaf));
                }
            }
        }
        Ok(None)
    }

    /// Full bottom-up recomputation from leaf contents
    ///
    /// Returns `None` as soon as any node's stored hash disagrees with its
    /// recomputed value.
    fn recompute(&self, id: NodeId) -> Result<Option<Hash>> {
        let node = &self.nodes[id];
        let recomputed = match &node.kind {
            NodeKind::Leaf { content, .. } => content.calculate_hash()?,
            NodeKind::Internal { left, right } => {
                let left = match self.recompute(*left)? {
                    Some(hash) => hash,
                    None => return Ok(None),
                };
                let right = match self.recompute(*right)? {
                    Some(hash) => hash,
                    None => return Ok(None),
                };
                Hash::combine::<D>(&left, &right)
            }
        };
        if recomputed != node.hash {
            return Ok(None);
        }
        Ok(Some(recomputed))
    }

    /// One-level recomputation: leaves re-derive from content, internal
    /// nodes combine their children's stored hashes
    fn shallow_hash(&self, id: NodeId) -> Result<Hash> {
        match &self.nodes[id].kind {
            NodeKind::Leaf { content, .. } => content.calculate_hash(),
            NodeKind::Internal { left, right } => Ok(Hash::combine::<D>(
                &self.nodes[*left].hash,
                &self.nodes[*right].hash,
            )),
        }
    }
}

/// Build the node arena bottom-up and return `(nodes, leaves, root)`
fn assemble<C: Content, D: Digest>(
    contents: &[C],
) -> Result<(Vec<MerkleNode<C>>, Vec<NodeId>, NodeId)> {
    if contents.is_empty() {
        return Err(Error::EmptyContent);
    }

    let mut nodes: Vec<MerkleNode<C>> = Vec::with_capacity(contents.len() * 2);
    let mut leaves = Vec::with_capacity(contents.len() + 1);
    for content in contents {
        let hash = content.calculate_hash()?;
        nodes.push(MerkleNode::leaf(hash, content.clone(), false));
        leaves.push(nodes.len() - 1);
    }

    // Even out the leaf level by cloning the last leaf
    if leaves.len() % 2 == 1 {
        let last = leaves[leaves.len() - 1];
        let hash = nodes[last].hash.clone();
        let content = contents[contents.len() - 1].clone();
        nodes.push(MerkleNode::leaf(hash, content, true));
        leaves.push(nodes.len() - 1);
    }

    // Pair adjacent nodes level by level until one remains. Odd counts can
    // recur at intermediate levels even after leaf padding (6 leaves give 3
    // internal nodes); the trailing node then pairs with itself.
    let mut level = leaves.clone();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut i = 0;
        while i < level.len() {
            let left = level[i];
            let right = if i + 1 < level.len() { level[i + 1] } else { left };
            let hash = Hash::combine::<D>(&nodes[left].hash, &nodes[right].hash);
            nodes.push(MerkleNode::internal(hash, left, right));
            let parent = nodes.len() - 1;
            nodes[left].parent = Some(parent);
            nodes[right].parent = Some(parent);
            next.push(parent);
            i += 2;
        }
        level = next;
    }

    let root = level[0];
    Ok((nodes, leaves, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use md5::Md5;

    #[derive(Clone, Debug)]
    struct Sha256Content(&'static str);

    impl Content for Sha256Content {
        fn calculate_hash(&self) -> Result<Hash> {
            Ok(Hash::digest::<Sha256>(self.0.as_bytes()))
        }

        fn equals(&self, other: &Self) -> Result<bool> {
            Ok(self.0 == other.0)
        }
    }

    #[derive(Clone, Debug)]
    struct Md5Content(&'static str);

    impl Content for Md5Content {
        fn calculate_hash(&self) -> Result<Hash> {
            Ok(Hash::digest::<Md5>(self.0.as_bytes()))
        }

        fn equals(&self, other: &Self) -> Result<bool> {
            Ok(self.0 == other.0)
        }
    }

    fn sha_tree(items: &[&'static str]) -> MerkleTree<Sha256Content> {
        let contents: Vec<Sha256Content> = items.iter().map(|s| Sha256Content(s)).collect();
        MerkleTree::build(&contents).unwrap()
    }

    #[test]
    fn test_build_empty_fails() {
        let contents: Vec<Sha256Content> = Vec::new();
        let result: Result<MerkleTree<Sha256Content>> = MerkleTree::build(&contents);
        assert!(matches!(result, Err(Error::EmptyContent)));
    }

    #[test]
    fn test_known_root_sha256() {
        let tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);
        assert_eq!(
            tree.root_hash().to_hex(),
            "5f30cc80133b9394156e24b233f0c4be32b24e44bb3381f02c7ba52619d0febc"
        );
    }

    #[test]
    fn test_known_root_md5() {
        let contents: Vec<Md5Content> = [
            "123", "234", "345", "456", "1123", "2234", "3345", "4456", "5567",
        ]
        .iter()
        .map(|s| Md5Content(s))
        .collect();
        let tree: MerkleTree<Md5Content, Md5> = MerkleTree::build(&contents).unwrap();

        assert_eq!(tree.root_hash().to_hex(), "9e55b5bf19fafb47d71644440bc6f494");
    }

    #[test]
    fn test_build_then_verify_all_sizes() {
        let items = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        for n in 1..=items.len() {
            let tree = sha_tree(&items[..n]);
            assert!(tree.verify().unwrap(), "size {} should verify", n);
        }
    }

    #[test]
    fn test_odd_leaf_count_is_padded() {
        let tree = sha_tree(&["Hello", "Hi", "Hey"]);

        assert_eq!(tree.leaf_count(), 4);
        let last = tree.leaves[tree.leaves.len() - 1];
        assert!(tree.nodes[last].is_duplicate());
        // Padding reuses the last real leaf's hash
        assert_eq!(tree.nodes[last].hash, tree.nodes[tree.leaves[2]].hash);
    }

    #[test]
    fn test_even_leaf_count_not_padded() {
        let tree = sha_tree(&["Hello", "Hi"]);

        assert_eq!(tree.leaf_count(), 2);
        assert!(tree.leaves.iter().all(|&l| !tree.nodes[l].is_duplicate()));
    }

    #[test]
    fn test_corrupt_root_hash_fails_verify() {
        let mut tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);
        assert!(tree.verify().unwrap());

        tree.root_hash = Hash::from_bytes(vec![1]);
        assert!(!tree.verify().unwrap());
    }

    #[test]
    fn test_corrupt_leaf_hash_fails_verify() {
        let mut tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);

        let leaf = tree.leaves[2];
        tree.nodes[leaf].hash = Hash::from_bytes(vec![1]);
        assert!(!tree.verify().unwrap());
    }

    #[test]
    fn test_corrupt_internal_hash_fails_verify() {
        let mut tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);

        let leaf = tree.leaves[0];
        let parent = tree.nodes[leaf].parent.unwrap();
        tree.nodes[parent].hash = Hash::from_bytes(vec![1]);
        assert!(!tree.verify().unwrap());
    }

    #[test]
    fn test_verify_content_for_all_leaves() {
        let contents: Vec<Sha256Content> = ["Hello", "Hi", "Hey", "Hola", "Bonjour"]
            .iter()
            .map(|s| Sha256Content(s))
            .collect();
        let tree: MerkleTree<Sha256Content> = MerkleTree::build(&contents).unwrap();

        for content in &contents {
            assert!(tree.verify_content(content).unwrap());
        }
    }

    #[test]
    fn test_verify_content_absent_is_false() {
        let tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);
        assert!(!tree.verify_content(&Sha256Content("NotInTree")).unwrap());
    }

    #[test]
    fn test_verify_content_after_corruption_and_rebuild() {
        let mut tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);

        let root = tree.root;
        tree.nodes[root].hash = Hash::from_bytes(vec![1]);
        tree.root_hash = Hash::from_bytes(vec![1]);
        assert!(!tree.verify_content(&Sha256Content("Hello")).unwrap());

        tree.rebuild().unwrap();
        assert!(tree.verify_content(&Sha256Content("Hello")).unwrap());
        assert_eq!(
            tree.root_hash().to_hex(),
            "5f30cc80133b9394156e24b233f0c4be32b24e44bb3381f02c7ba52619d0febc"
        );
    }

    #[test]
    fn test_rebuild_preserves_root_with_padding() {
        let mut tree = sha_tree(&["Hello", "Hi", "Hey"]);
        let before = tree.root_hash().clone();

        tree.rebuild().unwrap();
        assert_eq!(tree.root_hash(), &before);
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_rebuild_with_changes_root() {
        let mut tree = sha_tree(&["Hello", "Hi", "Hey", "Hola"]);
        let before = tree.root_hash().clone();

        let replaced: Vec<Sha256Content> = ["Hello", "Hi", "Hey", "Howdy"]
            .iter()
            .map(|s| Sha256Content(s))
            .collect();
        tree.rebuild_with(&replaced).unwrap();
        assert_ne!(tree.root_hash(), &before);
        assert!(tree.verify().unwrap());
    }

    #[test]
    fn test_contains() {
        let tree = sha_tree(&["Hello", "Hi"]);

        assert!(tree.contains(&Sha256Content("Hello")).unwrap());
        assert!(!tree.contains(&Sha256Content("Goodbye")).unwrap());
    }
}
