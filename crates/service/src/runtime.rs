//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_data_dir` without depending directly on `common`.

use std::path::Path;

/// Ensure the directory for the user store exists before the first write.
pub async fn ensure_data_dir(store_path: impl AsRef<Path>) -> anyhow::Result<()> {
    common::env::ensure_data_dir(store_path.as_ref()).await
}
