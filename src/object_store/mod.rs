//! Object store collaborator (spec §4.1).
//!
//! The object store is the source of truth: `put` overwrites, `get`
//! distinguishes "not found" from every other I/O failure, `delete` is
//! idempotent, and `list` returns keys under a prefix in lexicographic
//! order.

mod memory;
mod s3;

pub use memory::InMemoryObjectStore;
pub use s3::{S3Config, S3ObjectStore};

use async_trait::async_trait;
use thiserror::Error;

/// Errors the object store collaborator can raise.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// The requested key does not exist. Distinguished from other I/O
    /// failures so callers can treat it as "absent" rather than an error.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Any other I/O failure talking to the object store.
    #[error("object store I/O error: {0}")]
    Io(String),
}

/// Result alias for object store operations.
pub type Result<T> = std::result::Result<T, ObjectStoreError>;

/// The flat blob namespace backing `DocStore` and `ListStore`.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Overwrite `key` with `bytes`.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Read `key`. Returns `ObjectStoreError::NotFound` if it doesn't
    /// exist; any other failure is a different `ObjectStoreError` variant.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys under `prefix` in lexicographic order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
