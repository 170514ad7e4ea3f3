//! Digest type used for content addressing
//!
//! The crate is hash-agnostic: any [`digest::Digest`] implementation can be
//! plugged in, so digests are held as owned byte strings rather than a
//! fixed-width array.

use digest::Digest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A digest produced by the chosen hash strategy
///
/// The default value is the empty digest, which no real hash function
/// produces; it serves as a sentinel that can never name a stored node.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(Vec<u8>);

impl Hash {
    /// Create a hash from raw digest bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Hash(bytes)
    }

    /// Hash arbitrary data with the strategy `D`
    pub fn digest<D: Digest>(data: &[u8]) -> Self {
        Hash(D::digest(data).to_vec())
    }

    /// Hash the concatenation `left || right` with the strategy `D`
    ///
    /// This is the internal-node rule for both tree kinds; the argument
    /// order determines the resulting digest and must match the order used
    /// when the commitment was built.
    pub fn combine<D: Digest>(left: &Hash, right: &Hash) -> Self {
        let mut hasher = D::new();
        hasher.update(&left.0);
        hasher.update(&right.0);
        Hash(hasher.finalize().to_vec())
    }

    /// Get the raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s).map_err(|e| crate::Error::InvalidHash(e.to_string()))?;
        Ok(Hash(bytes))
    }

    /// Get a short prefix for display (first 7 chars, like git)
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        hex[..hex.len().min(7)].to_string()
    }

    /// Check whether this is the empty sentinel digest
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha256;

    #[test]
    fn test_hash_digest() {
        let h1 = Hash::digest::<Sha256>(b"hello");
        let h2 = Hash::digest::<Sha256>(b"hello");
        let h3 = Hash::digest::<Sha256>(b"world");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_combine_order_matters() {
        let a = Hash::digest::<Sha256>(b"a");
        let b = Hash::digest::<Sha256>(b"b");

        assert_ne!(Hash::combine::<Sha256>(&a, &b), Hash::combine::<Sha256>(&b, &a));
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h1 = Hash::digest::<Sha256>(b"test data");
        let hex = h1.to_hex();
        let h2 = Hash::from_hex(&hex).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_short() {
        let h = Hash::digest::<Sha256>(b"test");
        assert_eq!(h.short().len(), 7);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Hash::from_hex("not hex").is_err());
    }
}
