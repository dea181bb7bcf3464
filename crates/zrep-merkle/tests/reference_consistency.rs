//! The engine's paths must reproduce an independent dense reference
//! tree bit for bit: same sibling values, same parity bit convention,
//! same root.

#![allow(missing_docs)]

use zrep_core::base::{Commitment, TreeDepth};
use zrep_core::group::{Group, GroupName, Provider, ReputationLevel};
use zrep_merkle::{
    FieldHasher, GroupTrees, MemoryNodeStore, NodeStore as _, PoseidonHasher, ZeroHashes,
};

fn depth() -> TreeDepth {
    TreeDepth::new(6).expect("test depth is valid")
}

fn group() -> Group {
    Group::new(
        Provider::Github,
        GroupName::Reputation(ReputationLevel::Silver),
    )
}

/// A dense reference tree built level by level from the full leaf set,
/// padding odd levels with the zero hash. Deliberately shares no code
/// with the incremental engine.
struct ReferenceTree {
    levels: Vec<Vec<Commitment>>,
    zero_hashes: ZeroHashes,
}

impl ReferenceTree {
    fn build(leaves: &[Commitment], depth: TreeDepth) -> Self {
        let zero_hashes = ZeroHashes::compute(&PoseidonHasher, depth);
        let mut levels = vec![leaves.to_vec()];

        for level in 0..depth.get() {
            let zero = zero_hashes.level(level).expect("level within table");
            let current = levels.last().expect("at least the leaf level exists");
            let next: Vec<Commitment> = current
                .chunks(2)
                .map(|pair| {
                    let left = pair.first().copied().expect("chunks are non-empty");
                    let right = pair.get(1).copied().unwrap_or(zero);
                    PoseidonHasher.hash(&left, &right)
                })
                .collect();
            levels.push(next);
        }

        Self {
            levels,
            zero_hashes,
        }
    }

    fn root(&self) -> Commitment {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .expect("root level exists")
    }

    fn path(&self, mut position: usize, depth: TreeDepth) -> (Vec<Commitment>, Vec<u8>) {
        let mut elements = Vec::new();
        let mut bits = Vec::new();

        for level in 0..depth.get() {
            let zero = self.zero_hashes.level(level).expect("level within table");
            let nodes = self
                .levels
                .get(usize::from(level))
                .expect("level within tree");

            bits.push(if position % 2 == 0 { 0 } else { 1 });
            elements.push(nodes.get(position ^ 1).copied().unwrap_or(zero));
            position /= 2;
        }

        (elements, bits)
    }
}

#[test]
fn incremental_paths_match_the_dense_reference() {
    let engine = GroupTrees::new(MemoryNodeStore::new(), PoseidonHasher, depth());
    engine.seed_zero_hashes(false).expect("seeding succeeds");

    // 11 leaves: an odd count at several levels exercises the zero-hash
    // substitution on both the append and retrieval sides.
    let leaves: Vec<Commitment> = (0..11_u64)
        .map(|i| Commitment::from(i.wrapping_mul(31).wrapping_add(7)))
        .collect();

    for leaf in &leaves {
        engine
            .append_leaf(&group(), *leaf)
            .expect("insertion succeeds");
    }

    let reference = ReferenceTree::build(&leaves, depth());

    assert_eq!(
        engine
            .root(&group())
            .expect("root query succeeds")
            .expect("root exists"),
        reference.root(),
    );

    for (position, leaf) in leaves.iter().enumerate() {
        let path = engine
            .retrieve_path(&group(), *leaf)
            .expect("path retrieval succeeds");
        let (expected_elements, expected_bits) = reference.path(position, depth());

        assert_eq!(path.path_elements, expected_elements, "leaf {position}");
        assert_eq!(path.indices, expected_bits, "leaf {position}");
    }
}

#[test]
fn paths_verify_against_the_root() {
    let engine = GroupTrees::new(MemoryNodeStore::new(), PoseidonHasher, depth());
    engine.seed_zero_hashes(false).expect("seeding succeeds");

    let leaves: Vec<Commitment> = (0..10_u64).map(Commitment::from).collect();
    for leaf in &leaves {
        engine
            .append_leaf(&group(), *leaf)
            .expect("insertion succeeds");
    }
    let root = engine
        .root(&group())
        .expect("root query succeeds")
        .expect("root exists");

    // Folding each leaf up its path with the recorded parity bits must
    // land on the root, exactly as a membership circuit would.
    for leaf in &leaves {
        let path = engine
            .retrieve_path(&group(), *leaf)
            .expect("path retrieval succeeds");

        let mut node = *leaf;
        for (sibling, bit) in path.path_elements.iter().zip(&path.indices) {
            node = if *bit == 0 {
                PoseidonHasher.hash(&node, sibling)
            } else {
                PoseidonHasher.hash(sibling, &node)
            };
        }
        assert_eq!(node, root);
    }
}

#[test]
fn random_insertion_counts_keep_the_level_count_shape() {
    for _ in 0..4 {
        let engine = GroupTrees::new(MemoryNodeStore::new(), PoseidonHasher, depth());
        engine.seed_zero_hashes(false).expect("seeding succeeds");

        let count = u64::from(rand::random::<u8>() % 32).max(1);
        for i in 0..count {
            engine
                .append_leaf(&group(), Commitment::from(i))
                .expect("insertion succeeds");
        }

        let mut expected = count;
        for level in 0..depth().get() {
            assert_eq!(
                engine
                    .store()
                    .count_at_level(&group(), level)
                    .expect("count succeeds"),
                expected,
                "{count} leaves, level {level}"
            );
            expected = expected.div_ceil(2);
        }
        assert_eq!(
            engine
                .store()
                .count_at_level(&group(), depth().get())
                .expect("count succeeds"),
            1,
            "root level is always singular"
        );
    }
}
