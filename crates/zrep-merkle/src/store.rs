//! Repository interface for persisted tree nodes.

use zrep_core::base::Commitment;
use zrep_core::group::Group;

/// Point access to persisted `(group, level, index)` nodes.
///
/// Implementations are pure data access: no tree logic, no hashing. The
/// append engine is the only writer and keeps leaf hashes unique within
/// a group; a store that nonetheless observes a duplicate must reject it
/// rather than pick one.
pub trait NodeStore {
    /// Fetch the node at `(group, level, index)`.
    ///
    /// Returns `None` if the node was never materialized.
    ///
    /// # Errors
    /// Backend failures.
    fn get(&self, group: &Group, level: u8, index: u64)
    -> Result<Option<Commitment>, StoreError>;

    /// Create or overwrite the single node at `(group, level, index)`.
    ///
    /// The write is atomic with respect to concurrent readers of the
    /// same key: a reader observes either the old or the new value.
    ///
    /// # Errors
    /// Backend failures.
    fn upsert(
        &self,
        group: &Group,
        level: u8,
        index: u64,
        hash: Commitment,
    ) -> Result<(), StoreError>;

    /// Number of materialized nodes at `level` for `group`.
    ///
    /// `count_at_level(group, 0)` is the next free leaf index.
    ///
    /// # Errors
    /// Backend failures.
    fn count_at_level(&self, group: &Group, level: u8) -> Result<u64, StoreError>;

    /// Locate the leaf index holding `leaf`, `None` if absent.
    ///
    /// # Errors
    /// Backend failures, or [`StoreError::AmbiguousLeaf`] if the hash is
    /// materialized at more than one leaf slot.
    fn find_leaf_index(&self, group: &Group, leaf: &Commitment) -> Result<Option<u64>, StoreError>;
}

/// Storage for the process-wide zero-hash table.
pub trait ZeroHashStore {
    /// The stored table, leaf level first, `None` if never seeded.
    ///
    /// # Errors
    /// Backend failures.
    fn zero_hashes(&self) -> Result<Option<Vec<Commitment>>, StoreError>;

    /// Persist the table, replacing any previous one.
    ///
    /// # Errors
    /// Backend failures.
    fn put_zero_hashes(&self, table: &[Commitment]) -> Result<(), StoreError>;
}

/// Failures surfaced by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Opaque backend failure (I/O, connectivity). Propagated unchanged,
    /// never retried by the engine.
    #[error("storage backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The same leaf hash is materialized at two indices of one group,
    /// a data-integrity violation.
    #[error("leaf {commitment} of group {group} is materialized at indices {first} and {second}")]
    AmbiguousLeaf {
        /// The affected group.
        group: String,
        /// The duplicated leaf hash, hex encoded.
        commitment: String,
        /// Lower of the two conflicting indices.
        first: u64,
        /// Higher of the two conflicting indices.
        second: u64,
    },

    /// A stored value failed to decode.
    #[error("corrupt record at {key}: {reason}")]
    CorruptRecord {
        /// The store key of the bad record.
        key: String,
        /// What failed to decode.
        reason: &'static str,
    },
}

impl StoreError {
    /// Wrap a backend error.
    #[must_use]
    pub fn backend(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(error))
    }
}
