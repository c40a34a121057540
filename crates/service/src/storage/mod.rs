//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores and helpers to avoid duplication
//! across services that persist small collections as JSON.

pub mod json_file_store;
