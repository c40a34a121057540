use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed collection store.
///
/// Persists a `Vec<T>` as a pretty-printed JSON array. Reads always go to disk
/// so every call observes the latest committed file. Writes go to a temporary
/// sibling file which is fsynced and then renamed over the target, so readers
/// see either the previous or the new array, never a torn one.
///
/// The store does not serialize writers; callers doing read-modify-write must
/// hold their own lock around `load` + `save`.
pub struct JsonFileStore<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Point the store at a path. Nothing is created until the first `save`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load the whole collection.
    ///
    /// A missing or zero-byte file is an empty collection. Anything else that
    /// does not decode, whitespace included, is reported as
    /// `ServiceError::Decode` and left untouched on disk.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ServiceError::Read(format!("{}: {e}", self.file_path.display()))),
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Decode(format!("{}: {e}", self.file_path.display())))
    }

    /// Replace the whole collection on disk.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let tmp = self.write_temp(items).await?;
        self.commit(&tmp).await
    }

    /// First half of `save`: write the encoded collection to a temp sibling.
    pub(crate) async fn write_temp(&self, items: &[T]) -> Result<PathBuf, ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Encode(e.to_string()))?;

        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Write(format!("{}: {e}", parent.display())))?;
        }

        let tmp = self.temp_path();
        if let Err(e) = write_synced(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Write(format!("{}: {e}", tmp.display())));
        }
        debug!(tmp = %tmp.display(), bytes = data.len(), "temp file written");
        Ok(tmp)
    }

    /// Second half of `save`: atomically move the temp file over the target.
    pub(crate) async fn commit(&self, tmp: &Path) -> Result<(), ServiceError> {
        if let Err(e) = fs::rename(tmp, &self.file_path).await {
            warn!(tmp = %tmp.display(), error = %e, "rename failed; discarding temp file");
            let _ = fs::remove_file(tmp).await;
            return Err(ServiceError::Write(format!("{}: {e}", self.file_path.display())));
        }
        // the rename is already visible; a failed dir sync only weakens power-loss durability
        if let Some(parent) = self.file_path.parent() {
            if let Err(e) = sync_dir(parent).await {
                warn!(dir = %parent.display(), error = %e, "directory fsync after rename failed");
            }
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.file_path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}

/// Flush a directory entry change (rename) to disk.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store_path;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        label: String,
    }

    fn item(id: u32) -> Item {
        Item { id, label: format!("item-{id}") }
    }

    #[tokio::test]
    async fn missing_file_is_empty_and_not_created() -> Result<(), anyhow::Error> {
        let path = temp_store_path("json_file_store_missing");
        let store = JsonFileStore::<Item>::new(&path);

        assert!(store.load().await?.is_empty());
        assert!(fs::metadata(&path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_preserves_order() -> Result<(), anyhow::Error> {
        let path = temp_store_path("json_file_store_order");
        let store = JsonFileStore::<Item>::new(&path);

        store.save(&[item(3), item(1)]).await?;
        store.save(&[item(3), item(1), item(2)]).await?;

        let reloaded = JsonFileStore::<Item>::new(&path);
        assert_eq!(reloaded.load().await?, vec![item(3), item(1), item(2)]);

        // pretty-printed array on disk
        let text = fs::read_to_string(&path).await?;
        assert!(text.starts_with("[\n  {"));

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn zero_byte_file_is_empty() -> Result<(), anyhow::Error> {
        let path = temp_store_path("json_file_store_zero");
        fs::write(&path, b"").await?;
        let store = JsonFileStore::<Item>::new(&path);

        assert!(store.load().await?.is_empty());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn whitespace_only_file_is_corrupt() -> Result<(), anyhow::Error> {
        let path = temp_store_path("json_file_store_blank");
        fs::write(&path, b"  \n").await?;
        let store = JsonFileStore::<Item>::new(&path);

        assert!(matches!(store.load().await, Err(ServiceError::Decode(_))));
        assert_eq!(fs::read(&path).await?, b"  \n");

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_fails_and_is_left_alone() -> Result<(), anyhow::Error> {
        let path = temp_store_path("json_file_store_corrupt");
        fs::write(&path, b"[{\"id\": 1, \"label\": ").await?;
        let store = JsonFileStore::<Item>::new(&path);

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
        assert!(err.is_read_side());
        assert_eq!(fs::read(&path).await?, b"[{\"id\": 1, \"label\": ");

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn crash_before_commit_keeps_previous_snapshot() -> Result<(), anyhow::Error> {
        let path = temp_store_path("json_file_store_crash");
        let store = JsonFileStore::<Item>::new(&path);
        store.save(&[item(1)]).await?;

        // process dies after the temp write but before the rename
        let tmp = store.write_temp(&[item(1), item(2)]).await?;
        assert!(fs::metadata(&tmp).await.is_ok());
        assert_eq!(store.load().await?, vec![item(1)]);

        // a half-written temp file from an earlier crash is ignored too
        fs::write(&tmp, b"[{\"id\": 2").await?;
        assert_eq!(store.load().await?, vec![item(1)]);

        // the next full save still lands
        store.save(&[item(1), item(3)]).await?;
        assert_eq!(store.load().await?, vec![item(1), item(3)]);

        let _ = fs::remove_file(&tmp).await;
        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_commit_cleans_up_temp() -> Result<(), anyhow::Error> {
        // target is a non-empty directory, so the rename cannot replace it
        let dir = temp_store_path("json_file_store_dir");
        fs::create_dir_all(dir.join("occupied")).await?;
        let store = JsonFileStore::<Item>::new(&dir);

        let tmp = store.write_temp(&[item(1)]).await?;
        let err = store.commit(&tmp).await.unwrap_err();
        assert!(matches!(err, ServiceError::Write(_)));
        assert!(!err.is_read_side());
        assert!(fs::metadata(&tmp).await.is_err());

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn sync_dir_flushes_existing_directories() -> Result<(), anyhow::Error> {
        let dir = temp_store_path("json_file_store_syncdir");
        fs::create_dir_all(&dir).await?;

        sync_dir(&dir).await?;
        sync_dir(Path::new("")).await?;
        #[cfg(unix)]
        assert!(sync_dir(&dir.join("missing")).await.is_err());

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_creates_parent_dirs() -> Result<(), anyhow::Error> {
        let root = temp_store_path("json_file_store_nested");
        let path = root.join("a").join("b").join("users.json");
        let store = JsonFileStore::<Item>::new(&path);

        store.save(&[item(7)]).await?;
        assert_eq!(store.load().await?, vec![item(7)]);

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }
}
