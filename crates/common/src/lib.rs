//! Shared plumbing for the credential store workspace: logging setup,
//! runtime environment checks and the wire types every crate agrees on.

pub mod env;
pub mod types;
pub mod utils;
