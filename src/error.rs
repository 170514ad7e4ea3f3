//! Error types for veritree

use thiserror::Error;

/// Result type alias for veritree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in veritree operations
///
/// Hash mismatches are deliberately not represented here: a failed
/// verification is an ordinary `false` (or missing-value) result, not an
/// error. Only structural and lookup failures surface as `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot build tree without content")]
    EmptyContent,

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("proof node {index} (hash {hash}) missing from proof store")]
    ProofNodeMissing { index: usize, hash: String },

    #[error("key byte {0:?} outside trie alphabet 'a'..='z'")]
    InvalidKey(char),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("hash computation failed: {0}")]
    HashComputation(String),
}
