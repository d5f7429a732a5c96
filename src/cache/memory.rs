//! In-memory `ByteCache`, used by tests and the §8 scenario suite.
//!
//! Grounded on `database::cache::CacheManager`'s `CacheEntry::is_expired`
//! shape for TTL tracking, and on
//! `enterprise::cache::invalidation::PatternInvalidator::invalidate_pattern`
//! for glob-to-regex pattern matching in `keys`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use regex::Regex;

use super::{ByteCache, CacheError, Result};

struct Entry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache. Thread-safe and cheaply cloneable via the shared
/// `DashMap`.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<DashMap<String, Entry>>,
}

impl InMemoryCache {
    /// Create an empty in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn glob_to_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
        let escaped = regex::escape(pattern)
            .replace(r"\*", ".*")
            .replace(r"\?", ".");
        Regex::new(&format!("^{escaped}$"))
    }
}

#[async_trait]
impl ByteCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.bytes.clone())),
            Some(_) => {
                self.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, bytes: Vec<u8>, ttl: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                bytes,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let regex = Self::glob_to_regex(pattern)
            .map_err(|e| CacheError::Io(format!("invalid pattern {pattern:?}: {e}")))?;
        Ok(self
            .entries
            .iter()
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.key().clone())
            .filter(|key| regex.is_match(key))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_round_trips() {
        let cache = InMemoryCache::new();
        cache
            .set("k", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn get_missing_is_absent() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let cache = InMemoryCache::new();
        cache
            .set("k", b"v".to_vec(), Duration::from_millis(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let cache = InMemoryCache::new();
        cache.delete("never-existed").await.unwrap();
        cache
            .set("k", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete("k").await.unwrap();
        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_matches_glob_pattern() {
        let cache = InMemoryCache::new();
        for k in [
            "liststore::b::mylist.gz",
            "liststore::b::mylist/201301.gz",
            "liststore::b::mylist/201302.gz",
            "liststore::b::other.gz",
        ] {
            cache
                .set(k, b"x".to_vec(), Duration::from_secs(60))
                .await
                .unwrap();
        }
        let mut matched = cache.keys("liststore::b::mylist/*.gz").await.unwrap();
        matched.sort();
        assert_eq!(
            matched,
            vec![
                "liststore::b::mylist/201301.gz".to_string(),
                "liststore::b::mylist/201302.gz".to_string(),
            ]
        );
    }
}
