use eyre::Result;
use tracing::{info, instrument};
use zrep_core::base::Commitment;
use zrep_core::group::Group;

use crate::cli::StoreArgs;

use super::open_engine;

/// Insert an identity commitment into a group tree.
///
/// Logs the assigned leaf index and the new root.
///
/// # Errors
/// Returns an error if the store fails or the insertion is rejected
/// (unseeded zero hashes, unknown group, duplicate identity, full tree).
#[instrument(skip_all, fields(group = %group))]
pub async fn insert_identity(store: StoreArgs, group: Group, commitment: Commitment) -> Result<()> {
    let engine = open_engine(&store)?;

    let (index, root) = tokio::task::spawn_blocking(move || -> Result<(u64, Commitment)> {
        let index = engine.append_leaf(&group, commitment)?;
        let root = engine
            .root(&group)?
            .ok_or_else(|| eyre::eyre!("Root missing after insertion"))?;
        engine.store().flush()?;
        Ok((index, root))
    })
    .await??;

    info!(index, root = %root, "Inserted identity commitment");
    Ok(())
}
