use argon2::{
    password_hash::{Error as PhcError, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use configs::HashingConfig;
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Salted Argon2id hashing with a fixed work factor.
///
/// Both operations are CPU-bound and run on tokio's blocking pool.
/// Clones share the verification counter.
#[derive(Clone)]
pub struct SecretHasher {
    params: Params,
    decoy_hash: Arc<str>,
    verifications: Arc<AtomicUsize>,
}

impl SecretHasher {
    /// Validates the work factor and precomputes the decoy hash, so this
    /// costs one full hash at the configured parameters.
    pub fn new(cfg: &HashingConfig) -> Result<Self, AuthError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        let salt = SaltString::generate(&mut OsRng);
        let decoy_hash = Self::argon2(params.clone())
            .hash_password(uuid::Uuid::new_v4().as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();
        Ok(Self { params, decoy_hash: decoy_hash.into(), verifications: Arc::new(AtomicUsize::new(0)) })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    /// Hash a raw secret into a PHC string (`$argon2id$v=19$...`).
    pub async fn hash(&self, secret: String) -> Result<String, AuthError> {
        let params = self.params.clone();
        let hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(secret.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AuthError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))??;
        Ok(hash)
    }

    /// Check a raw secret against a stored PHC string.
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable
    /// or the verifier itself fails. Cost parameters come from the stored hash.
    pub async fn verify(&self, secret: String, stored: String) -> Result<bool, AuthError> {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored).map_err(|e| AuthError::Hashing(e.to_string()))?;
            match Self::argon2(params).verify_password(secret.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(PhcError::Password) => Ok(false),
                Err(e) => Err(AuthError::Hashing(e.to_string())),
            }
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Burn one verification against a hash no secret is known for, so a
    /// lookup miss costs the same as a wrong password. The outcome is discarded.
    pub async fn verify_decoy(&self, secret: String) {
        let _ = self.verify(secret, self.decoy_hash.to_string()).await;
    }

    /// Number of `verify` calls made through this hasher and its clones.
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fast_hasher;

    #[tokio::test]
    async fn hash_is_salted_phc_string() -> Result<(), anyhow::Error> {
        let hasher = fast_hasher();
        let a = hasher.hash("pw1".into()).await?;
        let b = hasher.hash("pw1".into()).await?;

        assert!(a.starts_with("$argon2id$v=19$"));
        assert_ne!(a, "pw1");
        assert_ne!(a, b, "same secret must hash differently under fresh salts");
        Ok(())
    }

    #[tokio::test]
    async fn verify_matches_only_the_original_secret() -> Result<(), anyhow::Error> {
        let hasher = fast_hasher();
        let hash = hasher.hash("pw1".into()).await?;

        assert!(hasher.verify("pw1".into(), hash.clone()).await?);
        assert!(!hasher.verify("wrong".into(), hash.clone()).await?);
        assert!(!hasher.verify(String::new(), hash).await?);
        Ok(())
    }

    #[tokio::test]
    async fn verify_uses_cost_from_stored_hash() -> Result<(), anyhow::Error> {
        let old = SecretHasher::new(&HashingConfig { memory_kib: 512, iterations: 2, parallelism: 1 })?;
        let hash = old.hash("pw1".into()).await?;

        assert!(fast_hasher().verify("pw1".into(), hash).await?);
        Ok(())
    }

    #[tokio::test]
    async fn garbage_hash_is_a_hashing_error() {
        let err = fast_hasher().verify("pw1".into(), "pw1".into()).await.unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }

    #[tokio::test]
    async fn decoy_uses_configured_cost_and_matches_nothing() -> Result<(), anyhow::Error> {
        let hasher = fast_hasher();
        let decoy = PasswordHash::new(&hasher.decoy_hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        assert_eq!(decoy.algorithm.as_str(), "argon2id");
        assert!(hasher.decoy_hash.contains("m=256,t=1,p=1"));

        assert!(!hasher.verify(String::new(), hasher.decoy_hash.to_string()).await?);
        hasher.verify_decoy("pw1".into()).await;
        assert_eq!(hasher.verifications(), 2);
        Ok(())
    }

    #[test]
    fn rejects_impossible_params() {
        let cfg = HashingConfig { memory_kib: 1, iterations: 1, parallelism: 1 };
        assert!(matches!(SecretHasher::new(&cfg), Err(AuthError::Hashing(_))));
    }
}
