//! Cache collaborator (spec §4.2).
//!
//! A write-through, read-through byte cache with TTL. `Absent` is
//! distinct from a present-but-empty entry, which is why `get` returns
//! `Option<Vec<u8>>` rather than an empty `Vec` standing in for "missing".

mod memory;
mod redis_backend;

pub use memory::InMemoryCache;
pub use redis_backend::RedisRemoteCache;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// TTL applied to every ListStore and DocStore cache write (spec §4.2).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Errors the cache collaborator can raise.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying cache backend failed.
    #[error("cache I/O error: {0}")]
    Io(String),
}

/// Result alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Namespace a DocStore key the way spec §4.2/§6 require:
/// `docstore::<objectStoreKey>`.
pub fn docstore_key(object_store_key: &str) -> String {
    format!("docstore::{object_store_key}")
}

/// Namespace a ListStore key: `liststore::<bucket>::<objectStoreKey>`. The
/// bucket component prevents cross-bucket collisions when one process
/// talks to several buckets through the same cache.
pub fn liststore_key(bucket: &str, object_store_key: &str) -> String {
    format!("liststore::{bucket}::{object_store_key}")
}

/// The byte cache backing DocStore and ListStore reads/writes.
#[async_trait]
pub trait ByteCache: Send + Sync {
    /// Read `key`. Returns `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `key` with the given TTL, overwriting any existing entry.
    async fn set(&self, key: &str, bytes: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys matching a glob `pattern` (`*` = any run of characters,
    /// `?` = any single character).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docstore_key_is_namespaced() {
        assert_eq!(docstore_key("a/b.gz"), "docstore::a/b.gz");
    }

    #[test]
    fn liststore_key_includes_bucket() {
        assert_eq!(
            liststore_key("bucket1", "mylist/201302.gz"),
            "liststore::bucket1::mylist/201302.gz"
        );
    }
}
