//! In-process node store used by tests and lightweight consumers.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use zrep_core::base::Commitment;
use zrep_core::group::Group;

use crate::store::{NodeStore, StoreError, ZeroHashStore};

type NodeKey = (Group, u8, u64);

/// A node store backed by in-process hash maps.
///
/// All access is serialized behind one mutex, which trivially satisfies
/// the per-key write atomicity of the repository contract. Leaf lookup
/// scans level 0 and rejects a duplicated hash instead of picking one.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: HashMap<NodeKey, Commitment>,
    zero_hashes: Option<Vec<Commitment>>,
}

impl MemoryNodeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NodeStore for MemoryNodeStore {
    fn get(
        &self,
        group: &Group,
        level: u8,
        index: u64,
    ) -> Result<Option<Commitment>, StoreError> {
        Ok(self.lock().nodes.get(&(*group, level, index)).copied())
    }

    fn upsert(
        &self,
        group: &Group,
        level: u8,
        index: u64,
        hash: Commitment,
    ) -> Result<(), StoreError> {
        self.lock().nodes.insert((*group, level, index), hash);
        Ok(())
    }

    fn count_at_level(&self, group: &Group, level: u8) -> Result<u64, StoreError> {
        let inner = self.lock();
        let count = inner
            .nodes
            .keys()
            .filter(|(g, l, _)| g == group && *l == level)
            .count();
        u64::try_from(count).map_err(StoreError::backend)
    }

    fn find_leaf_index(&self, group: &Group, leaf: &Commitment) -> Result<Option<u64>, StoreError> {
        let inner = self.lock();
        let mut found: Option<u64> = None;
        for ((g, level, index), hash) in &inner.nodes {
            if g != group || *level != 0 || hash != leaf {
                continue;
            }
            if let Some(first) = found {
                return Err(StoreError::AmbiguousLeaf {
                    group: group.to_string(),
                    commitment: leaf.to_hex(),
                    first: first.min(*index),
                    second: first.max(*index),
                });
            }
            found = Some(*index);
        }
        Ok(found)
    }
}

impl ZeroHashStore for MemoryNodeStore {
    fn zero_hashes(&self) -> Result<Option<Vec<Commitment>>, StoreError> {
        Ok(self.lock().zero_hashes.clone())
    }

    fn put_zero_hashes(&self, table: &[Commitment]) -> Result<(), StoreError> {
        self.lock().zero_hashes = Some(table.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use zrep_core::group::{GroupName, Provider, ReputationLevel};

    use super::*;

    fn group() -> Group {
        Group::new(
            Provider::Twitter,
            GroupName::Reputation(ReputationLevel::Gold),
        )
    }

    #[test]
    fn get_returns_none_for_unmaterialized_nodes() {
        let store = MemoryNodeStore::new();
        let node = store
            .get(&group(), 0, 0)
            .expect("get on empty store should succeed");
        assert!(node.is_none());
    }

    #[test]
    fn upsert_overwrites_a_single_key() {
        let store = MemoryNodeStore::new();
        let group = group();

        store
            .upsert(&group, 1, 0, Commitment::from(1_u64))
            .expect("first upsert should succeed");
        store
            .upsert(&group, 1, 0, Commitment::from(2_u64))
            .expect("second upsert should succeed");

        assert_eq!(
            store.get(&group, 1, 0).expect("get should succeed"),
            Some(Commitment::from(2_u64))
        );
        assert_eq!(
            store.count_at_level(&group, 1).expect("count"),
            1,
            "overwriting must not create a second node"
        );
    }

    #[test]
    fn counts_are_per_group_and_level() {
        let store = MemoryNodeStore::new();
        let gold = group();
        let silver = Group::new(
            Provider::Twitter,
            GroupName::Reputation(ReputationLevel::Silver),
        );

        for index in 0..3 {
            store
                .upsert(&gold, 0, index, Commitment::from(index))
                .expect("upsert should succeed");
        }
        store
            .upsert(&silver, 0, 0, Commitment::from(9_u64))
            .expect("upsert should succeed");

        assert_eq!(store.count_at_level(&gold, 0).expect("count"), 3);
        assert_eq!(store.count_at_level(&gold, 1).expect("count"), 0);
        assert_eq!(store.count_at_level(&silver, 0).expect("count"), 1);
    }

    #[test]
    fn find_leaf_index_rejects_ambiguity() {
        let store = MemoryNodeStore::new();
        let group = group();
        let leaf = Commitment::from(7_u64);

        store
            .upsert(&group, 0, 0, leaf)
            .expect("upsert should succeed");
        store
            .upsert(&group, 0, 5, leaf)
            .expect("upsert should succeed");

        assert!(matches!(
            store.find_leaf_index(&group, &leaf),
            Err(StoreError::AmbiguousLeaf {
                first: 0,
                second: 5,
                ..
            })
        ));
    }
}
