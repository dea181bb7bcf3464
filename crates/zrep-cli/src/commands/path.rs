use std::path::PathBuf;

use eyre::{Context as _, Result};
use tracing::{info, instrument};
use zrep_core::base::Commitment;
use zrep_core::group::Group;
use zrep_core::schema::MerklePath;

use crate::cli::StoreArgs;

use super::open_engine;

/// Export the Merkle authentication path of a commitment as JSON.
///
/// # Errors
/// Returns an error if the store fails, the commitment is not a member
/// of the group, or the output file cannot be written.
#[instrument(skip_all, fields(group = %group, file = ?output))]
pub async fn export_path(
    store: StoreArgs,
    group: Group,
    commitment: Commitment,
    output: PathBuf,
) -> Result<()> {
    let engine = open_engine(&store)?;

    let path = tokio::task::spawn_blocking(move || -> Result<MerklePath> {
        Ok(engine.retrieve_path(&group, commitment)?)
    })
    .await??;

    let json = serde_json::to_string_pretty(&path)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write path file {}", output.display()))?;

    info!(levels = path.depth(), "Exported merkle path");
    Ok(())
}
