//! Chunk storage port.
//!
//! The snapshot codec persists chunks through this trait; the backing blob
//! store (and its retry policy) lives outside the core. A chunk is an opaque
//! string payload; the store answers with an opaque reference.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle to a chunk previously written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRef {
    pub reference: String,
}

impl ChunkRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Chunk store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reference {0:?} not found")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Content-addressed key-value persistence for snapshot chunks.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persist a chunk payload and return its reference.
    async fn put(&self, payload: String) -> Result<ChunkRef, StoreError>;

    /// Fetch a chunk payload by reference.
    async fn get(&self, reference: &ChunkRef) -> Result<String, StoreError>;
}
