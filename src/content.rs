//! Content capability for Merkle tree leaves

use crate::{Hash, Result};

/// An item that can be committed to as a Merkle tree leaf
///
/// Implementations decide their own byte encoding and digest; the tree only
/// ever sees the resulting [`Hash`]. Both operations are fallible so that
/// implementations backed by fallible hash accumulators can propagate
/// failures instead of swallowing them (`Error::HashComputation` is the
/// conventional variant for this).
///
/// `Clone` is required because odd leaf counts are padded by duplicating the
/// last item, and rebuilds re-collect the leaf contents.
pub trait Content: Clone {
    /// Compute the digest of this item
    fn calculate_hash(&self) -> Result<Hash>;

    /// Compare this item against another for logical equality
    fn equals(&self, other: &Self) -> Result<bool>;
}
