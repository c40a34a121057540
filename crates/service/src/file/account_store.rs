use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::auth::domain::Account;
use crate::auth::errors::AuthError;
use crate::auth::repository::AccountRepository;
use crate::storage::json_file_store::JsonFileStore;

/// Account repository persisted as a JSON array (`users.json`).
pub struct JsonAccountRepository {
    store: JsonFileStore<Account>,
}

impl JsonAccountRepository {
    /// Point the repository at a file. The file is created on first registration.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonFileStore::new(path) }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

#[async_trait]
impl AccountRepository for JsonAccountRepository {
    async fn load(&self) -> Result<Vec<Account>, AuthError> {
        Ok(self.store.load().await?)
    }

    async fn persist(&self, accounts: &[Account]) -> Result<(), AuthError> {
        Ok(self.store.save(accounts).await?)
    }
}
