//! Testing utilities.
//!
//! Provides [`FlakyStore`], a key-value adapter with injectable failures
//! for asserting retry semantics (a failed save must leave an edit
//! session editable, a failed roster flush must roll the list back).

use crate::storage::{KeyValueStore, MemoryStore, StorageError};
use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};

/// In-memory store that fails the next N `get` or `set` calls.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_gets: AtomicU32,
    failing_sets: AtomicU32,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls to `set` fail.
    pub fn fail_next_sets(&self, n: u32) {
        self.failing_sets.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` calls to `get` fail.
    pub fn fail_next_gets(&self, n: u32) {
        self.failing_gets.store(n, Ordering::SeqCst);
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn injected() -> StorageError {
        StorageError::Io(io::Error::new(io::ErrorKind::Other, "injected failure"))
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if Self::take_failure(&self.failing_gets) {
            return Err(Self::injected());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if Self::take_failure(&self.failing_sets) {
            return Err(Self::injected());
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }
}
