//! Command implementations for the `zrep` CLI.

mod dump;
mod insert;
mod inspect;
mod path;
mod seed;

pub use dump::dump_nodes;
pub use insert::insert_identity;
pub use inspect::{show_root, show_status};
pub use path::export_path;
pub use seed::seed_zero_hashes;

use eyre::Context as _;
use zrep_merkle::{GroupTrees, PoseidonHasher};
use zrep_store::SledNodeStore;

use crate::cli::StoreArgs;

type Engine = GroupTrees<SledNodeStore, PoseidonHasher>;

fn open_engine(store: &StoreArgs) -> eyre::Result<Engine> {
    let db = SledNodeStore::open(&store.db)
        .with_context(|| format!("Failed to open node store at {}", store.db.display()))?;
    Ok(GroupTrees::new(db, PoseidonHasher, store.depth))
}
