//! Construction-time configuration.
//!
//! All fields here are required, matching spec §6: there is no sensible
//! default for a bucket identifier or a set of credentials, so (unlike
//! most config structs in this codebase's lineage) there is no
//! `Default` impl.

use serde::{Deserialize, Serialize};

/// Object-store connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Bucket (or container) identifier.
    pub bucket: String,
    /// Access key for the object store.
    pub access_key: String,
    /// Secret key for the object store.
    pub secret_key: String,
    /// Custom endpoint, for S3-compatible services other than AWS.
    pub endpoint: Option<String>,
}

/// Cache connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache host.
    pub host: String,
    /// Cache port.
    pub port: u16,
}

impl CacheConfig {
    /// `redis://host:port` connection string for `redis::Client::open`.
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}

/// Full construction-time configuration for a `DocStore`/`ListStore` pair
/// sharing one bucket and one cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Object-store configuration.
    pub object_store: ObjectStoreConfig,
    /// Cache configuration.
    pub cache: CacheConfig,
}

impl StoreConfig {
    /// Construct configuration from its required parts.
    pub fn new(object_store: ObjectStoreConfig, cache: CacheConfig) -> Self {
        Self {
            object_store,
            cache,
        }
    }
}
