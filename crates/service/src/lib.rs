//! Service layer for the credential store.
//! - Separates business logic (`auth`) from persistence (`storage`, `file`).
//! - Repositories are traits so the JSON file backend can be swapped out.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod file;
