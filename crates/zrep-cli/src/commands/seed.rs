use eyre::Result;
use tracing::{info, instrument};

use crate::cli::StoreArgs;

use super::open_engine;

/// Seed the zero-hash table for the configured depth.
///
/// # Errors
/// Returns an error if the store cannot be opened or written.
#[instrument(skip_all, fields(depth = store.depth.get(), force))]
pub async fn seed_zero_hashes(store: StoreArgs, force: bool) -> Result<()> {
    let engine = open_engine(&store)?;

    tokio::task::spawn_blocking(move || -> Result<()> {
        engine.seed_zero_hashes(force)?;
        engine.store().flush()?;
        Ok(())
    })
    .await??;

    info!("Zero hashes ready");
    Ok(())
}
