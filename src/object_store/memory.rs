//! In-memory `ObjectStoreClient`, used by tests and the §8 scenario suite.
//!
//! Grounded on `enterprise::eventsource::store::InMemoryEventStore`'s
//! shape: a single lock around a map, `Arc`-shared so the store can be
//! cloned across test tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ObjectStoreClient, ObjectStoreError, Result};

/// In-memory object store. `BTreeMap` gives `list` its required
/// lexicographic ordering for free.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    /// Create an empty in-memory object store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored, for test assertions.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl ObjectStoreClient for InMemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.objects.lock().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .lock()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
