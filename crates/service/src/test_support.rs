#![cfg(test)]
use std::path::PathBuf;

use configs::HashingConfig;

use crate::auth::hashing::SecretHasher;

/// Unique path under the system temp dir; nothing is created.
pub fn temp_store_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.json", uuid::Uuid::new_v4()))
}

/// Argon2id with the smallest sensible cost so tests stay fast in debug builds.
pub fn fast_hasher() -> SecretHasher {
    SecretHasher::new(&HashingConfig { memory_kib: 256, iterations: 1, parallelism: 1 })
        .expect("valid test hashing params")
}
