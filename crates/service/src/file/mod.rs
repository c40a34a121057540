//! File-backed implementations of the service repositories.

pub mod account_store;
