//! Engine error kinds.

use zrep_core::base::Commitment;
use zrep_core::group::Group;

use crate::store::StoreError;

/// Errors surfaced by tree maintenance and path retrieval.
///
/// Every failure is terminal for the triggering call; the engine never
/// retries. A failed append may have partially applied: each write on
/// the root path is individually valid, and the affected subtree is
/// repaired by the next successful insertion into it.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The zero-hash table was never seeded for the configured depth.
    #[error("zero hashes are not seeded for depth {depth}")]
    ZeroHashesNotSeeded {
        /// The configured tree depth.
        depth: u8,
    },

    /// The provider/name pairing does not identify a recognized group.
    #[error("unknown group {group}")]
    GroupNotFound {
        /// The rejected pairing.
        group: Group,
    },

    /// The commitment is already a leaf of the group.
    #[error("identity commitment {commitment} is already a member of group {group}")]
    DuplicateIdentity {
        /// The affected group.
        group: Group,
        /// The duplicated commitment.
        commitment: Commitment,
    },

    /// The group tree already holds `2^depth` leaves.
    #[error("group {group} tree is full at {capacity} leaves")]
    TreeFull {
        /// The affected group.
        group: Group,
        /// The tree capacity, `2^depth`.
        capacity: u64,
    },

    /// The commitment is not a leaf of the group.
    #[error("identity commitment {commitment} is not a member of group {group}")]
    IdentityNotFound {
        /// The queried group.
        group: Group,
        /// The absent commitment.
        commitment: Commitment,
    },

    /// A store-level failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
