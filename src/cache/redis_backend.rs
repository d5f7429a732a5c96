//! Redis-backed `ByteCache`.
//!
//! Grounded on `database::cache::CacheManager`'s L3 tier: a
//! `redis::aio::ConnectionManager` wrapped in a `tokio::sync::RwLock`,
//! driven with raw `redis::cmd` invocations (`GET`/`SETEX`/`DEL`/`KEYS`)
//! rather than the higher-level typed API, since this cache only ever
//! stores opaque bytes.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tokio::sync::RwLock;

use crate::config::CacheConfig;

use super::{ByteCache, CacheError, Result};

/// Cache client backed by a single Redis (or Redis-compatible) instance.
pub struct RedisRemoteCache {
    conn: RwLock<ConnectionManager>,
}

impl RedisRemoteCache {
    /// Connect to the Redis instance described by `config`.
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_url())
            .map_err(|e| CacheError::Io(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Io(format!("redis connect failed: {e}")))?;
        Ok(Self {
            conn: RwLock::new(conn),
        })
    }
}

#[async_trait]
impl ByteCache for RedisRemoteCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.write().await;
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::Io(format!("GET {key} failed: {e}")))
    }

    async fn set(&self, key: &str, bytes: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.write().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs())
            .arg(bytes)
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::Io(format!("SETEX {key} failed: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.write().await;
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::Io(format!("DEL {key} failed: {e}")))
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.write().await;
        redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::Io(format!("KEYS {pattern} failed: {e}")))
    }
}
