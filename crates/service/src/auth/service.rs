use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::domain::{Account, Confirmation, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::hashing::SecretHasher;
use super::repository::AccountRepository;

/// The two operations the HTTP layer needs. Object-safe so handlers can hold
/// an `Arc<dyn CredentialStore>` regardless of the backing repository.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn register(&self, input: RegisterInput) -> Result<Confirmation, AuthError>;
    async fn authenticate(&self, input: LoginInput) -> Result<Confirmation, AuthError>;
}

/// Auth business service independent of web framework.
///
/// Registrations are serialized by an internal lock, so use exactly one
/// `AuthService` per backing store.
pub struct AuthService<R: AccountRepository> {
    repo: Arc<R>,
    hasher: SecretHasher,
    write_lock: Mutex<()>,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: SecretHasher) -> Self {
        Self { repo, hasher, write_lock: Mutex::new(()) }
    }

    /// Register a new account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, hashing::SecretHasher, repository::mock::MockAccountRepository};
    /// use service::auth::domain::{Confirmation, RegisterInput};
    /// use configs::HashingConfig;
    /// use std::sync::Arc;
    /// let hasher = SecretHasher::new(&HashingConfig { memory_kib: 256, iterations: 1, parallelism: 1 }).unwrap();
    /// let svc = AuthService::new(Arc::new(MockAccountRepository::default()), hasher);
    /// let input = RegisterInput { name: "Ann".into(), email: "a@x.com".into(), password: "pw1".into() };
    /// let done = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(done, Confirmation::Registered);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<Confirmation, AuthError> {
        input.validate()?;
        let RegisterInput { name, email, password } = input;

        // load, check, append and write must not interleave with another registration
        let _guard = self.write_lock.lock().await;

        let mut accounts = self.repo.load().await?;
        if accounts.iter().any(|a| a.email == email) {
            debug!("email already registered");
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = self.hasher.hash(password.clone()).await?;
        if password_hash.is_empty() || password_hash == password {
            return Err(AuthError::Hashing("hasher returned an unusable value".into()));
        }

        accounts.push(Account { name, email, password_hash });
        self.repo.persist(&accounts).await.map_err(|e| {
            warn!(error = %e, "registration not persisted");
            e
        })?;

        info!(accounts = accounts.len(), "user_registered");
        Ok(Confirmation::Registered)
    }

    /// Check an email/password pair against the store.
    ///
    /// Takes no lock: the repository only ever exposes complete snapshots.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, hashing::SecretHasher, repository::mock::MockAccountRepository};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use service::auth::errors::AuthError;
    /// use configs::HashingConfig;
    /// use std::sync::Arc;
    /// let hasher = SecretHasher::new(&HashingConfig { memory_kib: 256, iterations: 1, parallelism: 1 }).unwrap();
    /// let svc = AuthService::new(Arc::new(MockAccountRepository::default()), hasher);
    /// tokio_test::block_on(svc.register(RegisterInput { name: "Ann".into(), email: "a@x.com".into(), password: "pw1".into() })).unwrap();
    /// assert!(tokio_test::block_on(svc.authenticate(LoginInput { email: "a@x.com".into(), password: "pw1".into() })).is_ok());
    /// let err = tokio_test::block_on(svc.authenticate(LoginInput { email: "a@x.com".into(), password: "nope".into() })).unwrap_err();
    /// assert!(matches!(err, AuthError::InvalidCredentials));
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<Confirmation, AuthError> {
        let account = match self.repo.find_by_email(&input.email).await? {
            Some(account) => account,
            None => {
                debug!("unknown email");
                self.hasher.verify_decoy(input.password).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(input.password, account.password_hash).await? {
            debug!("password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        info!("user_authenticated");
        Ok(Confirmation::Authenticated)
    }
}

#[async_trait]
impl<R: AccountRepository> CredentialStore for AuthService<R> {
    async fn register(&self, input: RegisterInput) -> Result<Confirmation, AuthError> {
        self.register(input).await
    }

    async fn authenticate(&self, input: LoginInput) -> Result<Confirmation, AuthError> {
        self.authenticate(input).await
    }
}
