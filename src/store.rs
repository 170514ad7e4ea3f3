//! Content-addressed in-memory store
//!
//! The simplest possible storage layer: a map from hex-encoded digest to
//! value. The trie keeps all non-root nodes here, addressed by their own
//! hash, which is what lets a proof be extracted as a small, isolated
//! sub-store.

use crate::{Error, Hash, Result};
use std::collections::HashMap;

/// An in-memory map keyed by content hash
///
/// Values have copy semantics: [`get`](MemoryStore::get) hands out an
/// independent clone, never a live reference into the store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore<V: Clone> {
    kv: HashMap<String, V>,
}

impl<V: Clone> MemoryStore<V> {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore { kv: HashMap::new() }
    }

    /// Store a value under a hash, replacing any previous entry
    pub fn put(&mut self, hash: &Hash, value: V) {
        self.kv.insert(hash.to_hex(), value);
    }

    /// Remove the entry for a hash, if present
    pub fn delete(&mut self, hash: &Hash) {
        self.kv.remove(&hash.to_hex());
    }

    /// Check whether a hash has an entry
    pub fn has(&self, hash: &Hash) -> bool {
        self.kv.contains_key(&hash.to_hex())
    }

    /// Fetch a copy of the value stored under a hash
    pub fn get(&self, hash: &Hash) -> Result<V> {
        self.kv
            .get(&hash.to_hex())
            .cloned()
            .ok_or_else(|| Error::NotFound(hash.to_hex()))
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.kv.len()
    }

    /// Check whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.kv.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha256;

    #[test]
    fn test_put_get_has_delete() {
        let mut store: MemoryStore<String> = MemoryStore::new();
        let hash = Hash::digest::<Sha256>(b"key");

        assert!(!store.has(&hash));
        store.put(&hash, "value".to_string());
        assert!(store.has(&hash));
        assert_eq!(store.get(&hash).unwrap(), "value");
        assert_eq!(store.len(), 1);

        store.delete(&hash);
        assert!(!store.has(&hash));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store: MemoryStore<String> = MemoryStore::new();
        let hash = Hash::digest::<Sha256>(b"missing");

        match store.get(&hash) {
            Err(Error::NotFound(key)) => assert_eq!(key, hash.to_hex()),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_get_returns_independent_copy() {
        let mut store: MemoryStore<Vec<u8>> = MemoryStore::new();
        let hash = Hash::digest::<Sha256>(b"key");
        store.put(&hash, vec![1, 2, 3]);

        let mut copy = store.get(&hash).unwrap();
        copy.push(4);

        assert_eq!(store.get(&hash).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_put_replaces_existing() {
        let mut store: MemoryStore<u32> = MemoryStore::new();
        let hash = Hash::digest::<Sha256>(b"key");

        store.put(&hash, 1);
        store.put(&hash, 2);
        assert_eq!(store.get(&hash).unwrap(), 2);
        assert_eq!(store.len(), 1);
    }
}
