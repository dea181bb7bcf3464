//! Zero-hash table: per-level hashes of the empty subtree.

use zrep_core::base::{Commitment, TreeDepth};

use crate::hasher::FieldHasher;

/// Precomputed "empty subtree" hashes, one per level `0..=depth`.
///
/// Level 0 is the canonical zero commitment; each further level hashes
/// the previous entry with itself. The table is process-wide and
/// independent of any group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroHashes(Vec<Commitment>);

impl ZeroHashes {
    /// Compute the table for `depth` using `hasher`.
    #[must_use]
    pub fn compute<H: FieldHasher>(hasher: &H, depth: TreeDepth) -> Self {
        let mut table = Vec::with_capacity(depth.levels());
        let mut current = Commitment::ZERO;
        table.push(current);
        for _ in 0..depth.get() {
            current = hasher.hash(&current, &current);
            table.push(current);
        }
        Self(table)
    }

    /// Reconstruct a table from stored entries.
    ///
    /// Returns `None` unless `entries` covers exactly `0..=depth`.
    #[must_use]
    pub fn from_entries(entries: Vec<Commitment>, depth: TreeDepth) -> Option<Self> {
        (entries.len() == depth.levels()).then(|| Self(entries))
    }

    /// The zero hash for `level`, `None` outside the table.
    #[must_use]
    pub fn level(&self, level: u8) -> Option<Commitment> {
        self.0.get(usize::from(level)).copied()
    }

    /// All entries, leaf level first.
    #[must_use]
    pub fn as_slice(&self) -> &[Commitment] {
        &self.0
    }
}
