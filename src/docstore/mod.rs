//! DocStore — a flat blob namespace keyed by `(path, id)` (spec §4.4).
//!
//! Grounded directly on `examples/original_source/docstore.py`: every
//! mutator writes the object store before the cache, and a `NotFound`
//! from the object store evicts any stale cache entry rather than
//! surfacing as an error.

use std::sync::Arc;

use crate::cache::{docstore_key, ByteCache, DEFAULT_TTL};
use crate::compression;
use crate::error::{Result, StoreError};
use crate::object_store::{ObjectStoreClient, ObjectStoreError};

/// Flat, cache-through blob store keyed by `(path, id)`.
pub struct DocStore {
    object_store: Arc<dyn ObjectStoreClient>,
    cache: Arc<dyn ByteCache>,
}

impl DocStore {
    /// Construct a `DocStore` over the given collaborators.
    pub fn new(object_store: Arc<dyn ObjectStoreClient>, cache: Arc<dyn ByteCache>) -> Self {
        Self {
            object_store,
            cache,
        }
    }

    fn object_key(path: &str, id: &str) -> String {
        format!("{path}/{id}.gz")
    }

    /// Store `bytes` under `(path, id)`, replacing any prior value.
    ///
    /// Compresses once, writes to the object store, then writes the same
    /// compressed bytes to the cache. On object-store failure the cache
    /// is left untouched.
    pub async fn put(&self, path: &str, id: &str, bytes: &[u8]) -> Result<()> {
        let compressed = compression::compress(bytes).map_err(|e| {
            StoreError::ObjectStore(ObjectStoreError::Io(format!("compress failed: {e}")))
        })?;
        let key = Self::object_key(path, id);

        self.object_store.put(&key, compressed.clone()).await?;
        self.cache
            .set(&docstore_key(&key), compressed, DEFAULT_TTL)
            .await?;
        Ok(())
    }

    /// Read the bytes stored under `(path, id)`, or `None` if absent.
    ///
    /// Cache is consulted first; on miss the object store is read, and a
    /// `NotFound` there evicts any stale cache entry and returns `None`
    /// rather than propagating as an error.
    pub async fn get(&self, path: &str, id: &str) -> Result<Option<Vec<u8>>> {
        let key = Self::object_key(path, id);
        let cache_key = docstore_key(&key);

        if let Some(compressed) = self.cache.get(&cache_key).await? {
            let bytes = compression::decompress(&compressed).map_err(|e| {
                StoreError::ObjectStore(ObjectStoreError::Io(format!("decompress failed: {e}")))
            })?;
            return Ok(Some(bytes));
        }

        match self.object_store.get(&key).await {
            Ok(compressed) => {
                self.cache
                    .set(&cache_key, compressed.clone(), DEFAULT_TTL)
                    .await?;
                let bytes = compression::decompress(&compressed).map_err(|e| {
                    StoreError::ObjectStore(ObjectStoreError::Io(format!(
                        "decompress failed: {e}"
                    )))
                })?;
                Ok(Some(bytes))
            }
            Err(ObjectStoreError::NotFound(_)) => {
                self.cache.delete(&cache_key).await?;
                Ok(None)
            }
            Err(other) => Err(StoreError::ObjectStore(other)),
        }
    }

    /// Delete `(path, id)` from both the object store and the cache.
    /// Idempotent.
    pub async fn delete(&self, path: &str, id: &str) -> Result<()> {
        let key = Self::object_key(path, id);
        self.object_store.delete(&key).await?;
        self.cache.delete(&docstore_key(&key)).await?;
        Ok(())
    }

    /// Enumerate up to `limit` object-store keys under `path`. The cache
    /// is never consulted — listing is authoritative only at the object
    /// store.
    pub async fn list(&self, path: &str, limit: usize) -> Result<Vec<String>> {
        let mut keys = self.object_store.list(path).await?;
        keys.truncate(limit);
        Ok(keys)
    }

    /// Remove the cache entry for `(path, id)` without touching durable
    /// state. Exists to let tests force the cache-miss repair path (see
    /// `examples/original_source/test_docstore.py`'s
    /// `ds._deleteFromCache`).
    pub async fn delete_from_cache(&self, path: &str, id: &str) -> Result<()> {
        let key = Self::object_key(path, id);
        self.cache.delete(&docstore_key(&key)).await?;
        Ok(())
    }
}
