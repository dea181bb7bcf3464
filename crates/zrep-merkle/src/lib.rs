//! Per-group append-only Merkle trees of identity commitments.
//!
//! The engine maintains one fixed-depth tree per group, inserts leaves
//! incrementally and extracts authentication paths for zero-knowledge
//! membership proofs. Storage and the two-input hash are injected
//! dependencies.

mod engine;
mod error;
mod hasher;
mod memory;
mod store;
mod zero;

pub use engine::GroupTrees;
pub use error::TreeError;
pub use hasher::{FieldHasher, PoseidonHasher};
pub use memory::MemoryNodeStore;
pub use store::{NodeStore, StoreError, ZeroHashStore};
pub use zero::ZeroHashes;
