//! In-memory chunk store.
//!
//! Content-addressed reference backend for tests and in-process embedding.
//! References are the hex hash of the payload, so identical payloads
//! deduplicate and a given state always exports to the same root reference.

use crate::store::{ChunkRef, ChunkStore, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory content-addressed chunk store with instrumented counters.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    chunks: Mutex<HashMap<String, String>>,
    writes: AtomicU64,
    reads: AtomicU64,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls served so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of `get` calls served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of distinct chunks held.
    pub fn len(&self) -> usize {
        self.chunks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.lock().is_empty()
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn put(&self, payload: String) -> Result<ChunkRef, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let reference = hex::encode(blake3::hash(payload.as_bytes()).as_bytes());
        self.chunks.lock().insert(reference.clone(), payload);
        Ok(ChunkRef::new(reference))
    }

    async fn get(&self, reference: &ChunkRef) -> Result<String, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.chunks
            .lock()
            .get(&reference.reference)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(reference.reference.clone()))
    }
}
