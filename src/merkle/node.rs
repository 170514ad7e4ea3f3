//! Merkle tree node types
//!
//! Nodes live in an arena owned by the tree and refer to each other by
//! index. The parent link is a plain index, giving the upward traversal the
//! proofs need without shared ownership or reference cycles.

use crate::Hash;

/// Index of a node within its tree's arena
pub(crate) type NodeId = usize;

/// What a node wraps: one content item, or two children
#[derive(Clone, Debug)]
pub(crate) enum NodeKind<C> {
    /// A leaf wrapping one content item
    ///
    /// `duplicate` marks the artificial clone appended when the leaf level
    /// has an odd count; it reuses the last real leaf's content and hash.
    Leaf { content: C, duplicate: bool },
    /// An internal node; children are owned exclusively by this node
    Internal { left: NodeId, right: NodeId },
}

/// A node in the Merkle tree arena
#[derive(Clone, Debug)]
pub(crate) struct MerkleNode<C> {
    /// Digest computed at construction time; never implicitly invalidated
    pub hash: Hash,
    /// Non-owning back-reference for upward walks; absent for the root
    pub parent: Option<NodeId>,
    pub kind: NodeKind<C>,
}

impl<C> MerkleNode<C> {
    pub fn leaf(hash: Hash, content: C, duplicate: bool) -> Self {
        MerkleNode {
            hash,
            parent: None,
            kind: NodeKind::Leaf { content, duplicate },
        }
    }

    pub fn internal(hash: Hash, left: NodeId, right: NodeId) -> Self {
        MerkleNode {
            hash,
            parent: None,
            kind: NodeKind::Internal { left, right },
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { duplicate: true, .. })
    }
}
