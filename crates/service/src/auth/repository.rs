use async_trait::async_trait;

use super::domain::Account;
use super::errors::AuthError;

/// Persistence abstraction for the account collection.
///
/// Implementations hand out full snapshots and replace the full collection on
/// write. `persist` must be all-or-nothing: after an `Err` the previous
/// snapshot is still what `load` returns.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<Account>, AuthError>;
    async fn persist(&self, accounts: &[Account]) -> Result<(), AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.load().await?.into_iter().find(|a| a.email == email))
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MockAccountRepository {
        accounts: Mutex<Vec<Account>>,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl MockAccountRepository {
        /// Make every subsequent `persist` fail as if the disk went away mid-write.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful `persist` calls.
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn load(&self) -> Result<Vec<Account>, AuthError> {
            let accounts = self.accounts.lock().await;
            Ok(accounts.clone())
        }

        async fn persist(&self, accounts: &[Account]) -> Result<(), AuthError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AuthError::StoreWrite("injected write failure".into()));
            }
            let mut stored = self.accounts.lock().await;
            *stored = accounts.to_vec();
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
