//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the directory holding the given data file exists.
///
/// The data file itself is not created; stores create it lazily on first write.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let Some(dir) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    match tokio::fs::metadata(data_file).await {
        Ok(meta) => debug!(path = %data_file.display(), bytes = meta.len(), "data file present"),
        Err(_) => warn!(path = %data_file.display(), "data file not found; it will be created on first write"),
    }
    Ok(())
}
