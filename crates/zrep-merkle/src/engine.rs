//! Append engine and path retrieval over per-group trees.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use zrep_core::base::{Commitment, TreeDepth};
use zrep_core::group::Group;
use zrep_core::schema::MerklePath;

use crate::error::TreeError;
use crate::hasher::FieldHasher;
use crate::store::{NodeStore, ZeroHashStore};
use crate::zero::ZeroHashes;

/// Level index of the leaves.
const LEAF_LEVEL: u8 = 0;

/// The tree maintenance and path retrieval engine.
///
/// One instance manages every group's tree against a shared store. The
/// store and the two-input hash are injected; beyond those the engine
/// holds only the per-group append locks that serialize index assignment
/// and duplicate detection (a lock is also taken while walking a path,
/// so a concurrent insertion cannot mix pre- and post-insertion siblings
/// in one response).
pub struct GroupTrees<S, H> {
    store: S,
    hasher: H,
    depth: TreeDepth,
    locks: Mutex<HashMap<Group, Arc<Mutex<()>>>>,
}

impl<S, H> GroupTrees<S, H>
where
    S: NodeStore + ZeroHashStore,
    H: FieldHasher,
{
    /// Create an engine over `store` with the injected `hasher`.
    ///
    /// `depth` must match the depth used for every previous operation on
    /// the same store; existing groups are not migrated.
    #[must_use]
    pub fn new(store: S, hasher: H, depth: TreeDepth) -> Self {
        Self {
            store,
            hasher,
            depth,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The configured tree depth.
    #[must_use]
    pub const fn depth(&self) -> TreeDepth {
        self.depth
    }

    /// Access the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Seed the zero-hash table.
    ///
    /// Computes the `depth + 1` entry sequence with the injected hasher
    /// and persists it. Idempotent: an existing table for the configured
    /// depth is kept unless `force` is set, in which case it is
    /// recomputed and overwritten. Must complete before any group is
    /// appended to or queried.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn seed_zero_hashes(&self, force: bool) -> Result<(), TreeError> {
        if !force
            && let Some(existing) = self.store.zero_hashes()?
            && ZeroHashes::from_entries(existing, self.depth).is_some()
        {
            debug!(depth = self.depth.get(), "zero hashes already seeded");
            return Ok(());
        }

        let table = ZeroHashes::compute(&self.hasher, self.depth);
        self.store.put_zero_hashes(table.as_slice())?;
        debug!(depth = self.depth.get(), force, "seeded zero hashes");
        Ok(())
    }

    /// Insert `commitment` as the next leaf of `group` and recompute
    /// every hash on its root path.
    ///
    /// Only the `depth` ancestors of the new leaf are touched. Returns
    /// the assigned leaf index; indices are dense, start at 0 and are
    /// never reused. The whole sequence runs under the group's append
    /// lock so concurrent appends cannot race on index assignment or
    /// duplicate detection.
    ///
    /// # Errors
    /// - [`TreeError::GroupNotFound`] for an unrecognized pairing.
    /// - [`TreeError::ZeroHashesNotSeeded`] before seeding.
    /// - [`TreeError::DuplicateIdentity`] if already a leaf.
    /// - [`TreeError::TreeFull`] at `2^depth` leaves.
    /// - [`TreeError::Store`] on store failures; the root path may then
    ///   be partially updated until the next insertion into the same
    ///   subtree repairs it.
    pub fn append_leaf(&self, group: &Group, commitment: Commitment) -> Result<u64, TreeError> {
        Self::ensure_known(group)?;
        let zero_hashes = self.load_zero_hashes()?;

        let lock = self.group_lock(group);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.store.find_leaf_index(group, &commitment)?.is_some() {
            return Err(TreeError::DuplicateIdentity {
                group: *group,
                commitment,
            });
        }

        let leaf_index = self.store.count_at_level(group, LEAF_LEVEL)?;
        if leaf_index >= self.depth.capacity() {
            return Err(TreeError::TreeFull {
                group: *group,
                capacity: self.depth.capacity(),
            });
        }

        self.store.upsert(group, LEAF_LEVEL, leaf_index, commitment)?;

        let mut index = leaf_index;
        for child_level in 0..self.depth.get() {
            let left_index = index & !1;
            let left = self.node_or_zero(group, child_level, left_index, &zero_hashes)?;
            let right = self.node_or_zero(group, child_level, left_index | 1, &zero_hashes)?;
            let parent = self.hasher.hash(&left, &right);

            index /= 2;
            let parent_level = child_level.saturating_add(1);
            self.store.upsert(group, parent_level, index, parent)?;
        }

        debug!(group = %group, index = leaf_index, "appended leaf");
        Ok(leaf_index)
    }

    /// Build the Merkle authentication path for `commitment`.
    ///
    /// Both returned sequences are leaf-to-root ordered and exactly
    /// `depth` long: the sibling hash and the position parity bit at
    /// each level, with absent siblings substituted by the level's zero
    /// hash. The output reproduces a reference incremental tree fed the
    /// same insertion sequence bit for bit.
    ///
    /// # Errors
    /// - [`TreeError::GroupNotFound`] for an unrecognized pairing.
    /// - [`TreeError::ZeroHashesNotSeeded`] before seeding.
    /// - [`TreeError::IdentityNotFound`] if not a leaf of the group.
    /// - [`TreeError::Store`] on store failures.
    pub fn retrieve_path(
        &self,
        group: &Group,
        commitment: Commitment,
    ) -> Result<MerklePath, TreeError> {
        Self::ensure_known(group)?;
        let zero_hashes = self.load_zero_hashes()?;

        let lock = self.group_lock(group);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(leaf_index) = self.store.find_leaf_index(group, &commitment)? else {
            return Err(TreeError::IdentityNotFound {
                group: *group,
                commitment,
            });
        };

        let levels = usize::from(self.depth.get());
        let mut path_elements = Vec::with_capacity(levels);
        let mut indices = Vec::with_capacity(levels);

        let mut index = leaf_index;
        for level in 0..self.depth.get() {
            indices.push(if index % 2 == 0 { 0 } else { 1 });
            path_elements.push(self.node_or_zero(group, level, index ^ 1, &zero_hashes)?);
            index /= 2;
        }

        Ok(MerklePath {
            path_elements,
            indices,
        })
    }

    /// The current root of `group`, `None` before the first insertion.
    ///
    /// # Errors
    /// Propagates group validation and store failures.
    pub fn root(&self, group: &Group) -> Result<Option<Commitment>, TreeError> {
        Self::ensure_known(group)?;
        Ok(self.store.get(group, self.depth.get(), 0)?)
    }

    fn ensure_known(group: &Group) -> Result<(), TreeError> {
        if group.is_valid() {
            Ok(())
        } else {
            Err(TreeError::GroupNotFound { group: *group })
        }
    }

    fn load_zero_hashes(&self) -> Result<ZeroHashes, TreeError> {
        let not_seeded = || TreeError::ZeroHashesNotSeeded {
            depth: self.depth.get(),
        };
        let entries = self.store.zero_hashes()?.ok_or_else(not_seeded)?;
        ZeroHashes::from_entries(entries, self.depth).ok_or_else(not_seeded)
    }

    fn group_lock(&self, group: &Group) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(*group).or_default())
    }

    fn node_or_zero(
        &self,
        group: &Group,
        level: u8,
        index: u64,
        zero_hashes: &ZeroHashes,
    ) -> Result<Commitment, TreeError> {
        if let Some(node) = self.store.get(group, level, index)? {
            return Ok(node);
        }
        zero_hashes
            .level(level)
            .ok_or(TreeError::ZeroHashesNotSeeded {
                depth: self.depth.get(),
            })
    }
}
