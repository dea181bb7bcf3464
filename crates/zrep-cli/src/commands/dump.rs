use std::path::PathBuf;

use eyre::{Context as _, Result};
use tracing::{info, instrument};
use zrep_core::group::Group;
use zrep_core::schema::NodeRecord;

use crate::cli::StoreArgs;

use super::open_engine;

/// Export every materialized node of a group tree as JSON records.
///
/// # Errors
/// Returns an error if the store fails or the output file cannot be
/// written.
#[instrument(skip_all, fields(group = %group, file = ?output))]
pub async fn dump_nodes(store: StoreArgs, group: Group, output: PathBuf) -> Result<()> {
    let engine = open_engine(&store)?;

    let records = tokio::task::spawn_blocking(move || -> Result<Vec<NodeRecord>> {
        Ok(engine.store().group_records(&group)?)
    })
    .await??;

    let json = serde_json::to_string_pretty(&records)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write node records file {}", output.display()))?;

    info!(nodes = records.len(), "Exported tree nodes");
    Ok(())
}
