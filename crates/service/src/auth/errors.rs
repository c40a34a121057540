use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateIdentity,
    /// Unknown email and wrong password are deliberately the same error.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("store read error: {0}")]
    StoreRead(String),
    #[error("store write error: {0}")]
    StoreWrite(String),
    #[error("hashing error: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::DuplicateIdentity => 1002,
            AuthError::InvalidCredentials => 1004,
            AuthError::Hashing(_) => 1101,
            AuthError::StoreRead(_) => 1200,
            AuthError::StoreWrite(_) => 1201,
        }
    }

    /// Message safe to show to the caller. Never includes internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "All fields are required.",
            AuthError::DuplicateIdentity => "Email is already registered.",
            AuthError::InvalidCredentials => "Invalid email or password.",
            AuthError::StoreRead(_) => "Error reading user data. File may be corrupted.",
            AuthError::StoreWrite(_) => "Error saving user data.",
            AuthError::Hashing(_) => "Error processing password.",
        }
    }

    /// Infrastructure failures, as opposed to problems with the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::StoreRead(_) | AuthError::StoreWrite(_) | AuthError::Hashing(_))
    }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        if e.is_read_side() {
            AuthError::StoreRead(e.to_string())
        } else {
            AuthError::StoreWrite(e.to_string())
        }
    }
}
