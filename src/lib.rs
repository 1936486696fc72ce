//! Ledgerfs: Virtual File System over a Signed Update Log
//!
//! A multi-tenant virtual file system whose ground truth is a replayable,
//! cryptographically-signed append log. Updates are materialized into an
//! in-memory directory tree and periodically flattened into a
//! content-addressed, chunked representation for persistence in an external
//! immutable blob store.

pub mod auth;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod snapshot;
pub mod store;
pub mod tree;
pub mod types;
pub mod update;
