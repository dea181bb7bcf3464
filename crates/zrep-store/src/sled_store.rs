//! The persistent node table.
//!
//! Three sled trees back the repository contract:
//! - `nodes` maps `provider/name/level/index` to a 32-byte node hash,
//! - `leaves` maps `provider/name/hash` to the leaf index, giving O(1)
//!   leaf lookup and making a duplicated leaf hash unrepresentable,
//! - `meta` holds the process-wide zero-hash table.
//!
//! Sled point writes are atomic per key, which is all the `upsert`
//! contract requires.

use std::path::Path;

use zrep_core::base::{COMMITMENT_SIZE, Commitment};
use zrep_core::group::Group;
use zrep_core::schema::NodeRecord;
use zrep_merkle::{NodeStore, StoreError, ZeroHashStore};

const ZERO_HASHES_KEY: &[u8] = b"zero_hashes";

/// A [`NodeStore`] and [`ZeroHashStore`] persisted in a sled database.
#[derive(Debug)]
pub struct SledNodeStore {
    db: sled::Db,
    nodes: sled::Tree,
    leaves: sled::Tree,
    meta: sled::Tree,
}

impl SledNodeStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    /// Backend failures opening the database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_db(sled::open(path).map_err(StoreError::backend)?)
    }

    /// Open an ephemeral store that is discarded on drop.
    ///
    /// # Errors
    /// Backend failures opening the database.
    pub fn temporary() -> Result<Self, StoreError> {
        Self::from_db(
            sled::Config::new()
                .temporary(true)
                .open()
                .map_err(StoreError::backend)?,
        )
    }

    fn from_db(db: sled::Db) -> Result<Self, StoreError> {
        let nodes = db.open_tree("nodes").map_err(StoreError::backend)?;
        let leaves = db.open_tree("leaves").map_err(StoreError::backend)?;
        let meta = db.open_tree("meta").map_err(StoreError::backend)?;
        Ok(Self {
            db,
            nodes,
            leaves,
            meta,
        })
    }

    /// Flush every pending write to disk.
    ///
    /// # Errors
    /// Backend failures.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush().map_err(StoreError::backend)?;
        Ok(())
    }

    /// All materialized nodes of `group`, in level-major order.
    ///
    /// # Errors
    /// Backend failures, or [`StoreError::CorruptRecord`] for a key or
    /// value that fails to decode.
    pub fn group_records(&self, group: &Group) -> Result<Vec<NodeRecord>, StoreError> {
        let prefix = format!("{group}/").into_bytes();
        let mut records = Vec::new();

        for entry in self.nodes.scan_prefix(&prefix) {
            let (key, value) = entry.map_err(StoreError::backend)?;
            let key = String::from_utf8_lossy(&key).into_owned();

            let mut segments = key.rsplitn(3, '/');
            let index = segments.next().and_then(|s| s.parse::<u64>().ok());
            let level = segments.next().and_then(|s| s.parse::<u8>().ok());
            let (Some(index), Some(level)) = (index, level) else {
                return Err(StoreError::CorruptRecord {
                    key,
                    reason: "node key is not provider/name/level/index",
                });
            };

            let hash = Self::decode_commitment(&key, &value)?;
            records.push(NodeRecord {
                provider: group.provider,
                name: group.name,
                level,
                index,
                hash,
            });
        }
        Ok(records)
    }

    fn node_key(group: &Group, level: u8, index: u64) -> Vec<u8> {
        format!("{group}/{level:03}/{index:020}").into_bytes()
    }

    fn level_prefix(group: &Group, level: u8) -> Vec<u8> {
        format!("{group}/{level:03}/").into_bytes()
    }

    fn leaf_key(group: &Group, leaf: &Commitment) -> Vec<u8> {
        format!("{group}/{}", leaf.to_hex()).into_bytes()
    }

    fn decode_commitment(key: &str, bytes: &[u8]) -> Result<Commitment, StoreError> {
        let bytes: [u8; COMMITMENT_SIZE] =
            bytes.try_into().map_err(|_| StoreError::CorruptRecord {
                key: key.to_owned(),
                reason: "node hash is not 32 bytes",
            })?;
        Commitment::from_bytes(&bytes).ok_or(StoreError::CorruptRecord {
            key: key.to_owned(),
            reason: "node hash is not a canonical field element",
        })
    }

    fn decode_index(key: &str, bytes: &[u8]) -> Result<u64, StoreError> {
        let bytes: [u8; 8] = bytes.try_into().map_err(|_| StoreError::CorruptRecord {
            key: key.to_owned(),
            reason: "leaf index is not 8 bytes",
        })?;
        Ok(u64::from_be_bytes(bytes))
    }
}

impl NodeStore for SledNodeStore {
    fn get(
        &self,
        group: &Group,
        level: u8,
        index: u64,
    ) -> Result<Option<Commitment>, StoreError> {
        let key = Self::node_key(group, level, index);
        let Some(value) = self.nodes.get(&key).map_err(StoreError::backend)? else {
            return Ok(None);
        };
        Self::decode_commitment(&String::from_utf8_lossy(&key), &value).map(Some)
    }

    fn upsert(
        &self,
        group: &Group,
        level: u8,
        index: u64,
        hash: Commitment,
    ) -> Result<(), StoreError> {
        let key = Self::node_key(group, level, index);

        if level == 0 {
            // Keep the leaf index consistent with the nodes table: refuse
            // to map one hash to two slots, and drop a stale mapping when
            // a leaf slot is overwritten.
            let leaf_key = Self::leaf_key(group, &hash);
            if let Some(existing) = self.leaves.get(&leaf_key).map_err(StoreError::backend)? {
                let existing =
                    Self::decode_index(&String::from_utf8_lossy(&leaf_key), &existing)?;
                if existing != index {
                    return Err(StoreError::AmbiguousLeaf {
                        group: group.to_string(),
                        commitment: hash.to_hex(),
                        first: existing.min(index),
                        second: existing.max(index),
                    });
                }
            }
            if let Some(old) = self.nodes.get(&key).map_err(StoreError::backend)? {
                let old = Self::decode_commitment(&String::from_utf8_lossy(&key), &old)?;
                if old != hash {
                    self.leaves
                        .remove(Self::leaf_key(group, &old))
                        .map_err(StoreError::backend)?;
                }
            }
            self.leaves
                .insert(leaf_key, index.to_be_bytes().to_vec())
                .map_err(StoreError::backend)?;
        }

        self.nodes
            .insert(key, hash.to_bytes().to_vec())
            .map_err(StoreError::backend)?;
        Ok(())
    }

    fn count_at_level(&self, group: &Group, level: u8) -> Result<u64, StoreError> {
        let mut count = 0_u64;
        for entry in self.nodes.scan_prefix(Self::level_prefix(group, level)) {
            entry.map_err(StoreError::backend)?;
            count = count.saturating_add(1);
        }
        Ok(count)
    }

    fn find_leaf_index(&self, group: &Group, leaf: &Commitment) -> Result<Option<u64>, StoreError> {
        let key = Self::leaf_key(group, leaf);
        let Some(value) = self.leaves.get(&key).map_err(StoreError::backend)? else {
            return Ok(None);
        };
        Self::decode_index(&String::from_utf8_lossy(&key), &value).map(Some)
    }
}

impl ZeroHashStore for SledNodeStore {
    fn zero_hashes(&self) -> Result<Option<Vec<Commitment>>, StoreError> {
        let Some(value) = self.meta.get(ZERO_HASHES_KEY).map_err(StoreError::backend)? else {
            return Ok(None);
        };
        if value.len() % COMMITMENT_SIZE != 0 {
            return Err(StoreError::CorruptRecord {
                key: "meta/zero_hashes".to_owned(),
                reason: "table length is not a multiple of 32 bytes",
            });
        }

        let mut table = Vec::with_capacity(value.len() / COMMITMENT_SIZE);
        for chunk in value.chunks_exact(COMMITMENT_SIZE) {
            table.push(Self::decode_commitment("meta/zero_hashes", chunk)?);
        }
        Ok(Some(table))
    }

    fn put_zero_hashes(&self, table: &[Commitment]) -> Result<(), StoreError> {
        let mut value = Vec::with_capacity(table.len().saturating_mul(COMMITMENT_SIZE));
        for entry in table {
            value.extend_from_slice(&entry.to_bytes());
        }
        self.meta
            .insert(ZERO_HASHES_KEY, value)
            .map_err(StoreError::backend)?;
        Ok(())
    }
}
