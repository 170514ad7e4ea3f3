//! # veritree
//!
//! Authenticated, content-addressed tree structures.
//!
//! A party holding only a short root digest can verify, via a small proof,
//! that a specific piece of data belongs to a larger committed set without
//! transferring the whole set. Two structures share the hash-derivation and
//! proof machinery:
//!
//! - **[`MerkleTree`]**: a balanced binary hash tree over an ordered list of
//!   [`Content`] items, with compact sibling-path inclusion proofs
//!   ([`MerkleProof`]).
//! - **[`Trie`]**: a 26-way prefix trie over lowercase-letter keys whose
//!   nodes are hash-addressed entries in an external [`NodeStore`]; a proof
//!   is the minimal sub-store of nodes along one key's path.
//!
//! Both are hash-agnostic: any [`digest::Digest`] implementation can be
//! plugged in, with SHA-256 as the default. Verification failures are plain
//! `false` (or missing-value) results; only structural and lookup failures
//! are errors.
//!
//! ## Example
//!
//! ```
//! use sha2::Sha256;
//! use veritree::{Content, Hash, MerkleTree, Result};
//!
//! #[derive(Clone)]
//! struct Record(String);
//!
//! impl Content for Record {
//!     fn calculate_hash(&self) -> Result<Hash> {
//!         Ok(Hash::digest::<Sha256>(self.0.as_bytes()))
//!     }
//!
//!     fn equals(&self, other: &Self) -> Result<bool> {
//!         Ok(self.0 == other.0)
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let records: Vec<Record> = ["alpha", "beta", "gamma"]
//!     .iter()
//!     .map(|s| Record(s.to_string()))
//!     .collect();
//!
//! let tree: MerkleTree<Record> = MerkleTree::build(&records)?;
//! let proof = tree.prove(&records[1])?.unwrap();
//!
//! // A verifier holding only the root hash replays the proof
//! let leaf_hash = records[1].calculate_hash()?;
//! assert!(proof.verify::<Sha256>(&leaf_hash, tree.root_hash()));
//! # Ok(())
//! # }
//! ```

pub mod merkle;
pub mod store;
pub mod trie;

mod content;
mod error;
mod hash;

pub use content::Content;
pub use error::{Error, Result};
pub use hash::Hash;
pub use merkle::{MerkleProof, MerkleTree, ProofStep, Side};
pub use store::MemoryStore;
pub use trie::{verify_proof, NodeStore, Trie, TrieNode, TrieProof, BRANCH_WIDTH};
