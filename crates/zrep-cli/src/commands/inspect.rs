use eyre::Result;
use tracing::{info, instrument, warn};
use zrep_core::base::Commitment;
use zrep_core::group::Group;
use zrep_merkle::NodeStore as _;

use crate::cli::StoreArgs;

use super::open_engine;

/// Log the current root of a group tree.
///
/// # Errors
/// Returns an error if the store fails or the group is unknown.
#[instrument(skip_all, fields(group = %group))]
pub async fn show_root(store: StoreArgs, group: Group) -> Result<()> {
    let engine = open_engine(&store)?;

    let root = tokio::task::spawn_blocking(move || -> Result<Option<Commitment>> {
        Ok(engine.root(&group)?)
    })
    .await??;

    match root {
        Some(root) => info!(root = %root, "Current group root"),
        None => warn!("Group tree is empty"),
    }
    Ok(())
}

/// Log per-level node counts of a group tree, leaves first.
///
/// # Errors
/// Returns an error if the store fails.
#[instrument(skip_all, fields(group = %group))]
pub async fn show_status(store: StoreArgs, group: Group) -> Result<()> {
    let engine = open_engine(&store)?;

    let counts = tokio::task::spawn_blocking(move || -> Result<Vec<u64>> {
        let mut counts = Vec::with_capacity(engine.depth().levels());
        for level in 0..=engine.depth().get() {
            counts.push(engine.store().count_at_level(&group, level)?);
        }
        Ok(counts)
    })
    .await??;

    info!(
        leaves = counts.first().copied().unwrap_or(0),
        ?counts,
        "Node counts per level"
    );
    Ok(())
}
