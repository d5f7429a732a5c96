//! Crate-wide error taxonomy.
//!
//! Mirrors the three kinds of failure the store can surface: a malformed
//! page (`DataError`, including the monotone-`ctime` violation
//! `NonFutureItemError` as a distinguished subtype), and passthrough
//! failures from the two collaborators (`ObjectStoreError`, `CacheError`).
//! Cache-miss and object-store "not found" are *not* represented here —
//! callers translate those into `Option`/empty-page reads before they
//! reach this type.

use thiserror::Error;

use crate::cache::CacheError;
use crate::object_store::ObjectStoreError;

/// Top-level error returned by `DocStore` and `ListStore` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A page failed to parse, or an append violated the monotone-ctime
    /// invariant.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// The object store collaborator failed for a reason other than
    /// "not found".
    #[error("object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    /// The cache collaborator failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Result alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Parse or invariant-violation errors for index/data pages.
#[derive(Debug, Error)]
pub enum DataError {
    /// A page's `magic` field didn't match the expected tag.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic {
        /// The magic tag this page type requires.
        expected: &'static str,
        /// The magic tag actually present.
        found: String,
    },

    /// A page's `version` field is not one this crate understands.
    #[error("unsupported page version: {0}")]
    BadVersion(u32),

    /// The page parsed as JSON but had the wrong shape (e.g. `ymtab`/`ctab`
    /// was not the expected container).
    #[error("malformed page: {0}")]
    Malformed(String),

    /// `append` would place an item at or before the list's known maximum
    /// `ctime`, violating invariant I5.
    #[error(transparent)]
    NonFutureItem(#[from] NonFutureItemError),
}

/// Raised when an append would violate the monotone-`ctime` invariant.
///
/// Carries the offending `ctime` and the maximum `ctime` already known to
/// the list, so callers can build a human-readable message without
/// re-deriving it.
#[derive(Debug, Error)]
#[error("item with ctime {ctime} is not after the list's known maximum ctime {known_max}")]
pub struct NonFutureItemError {
    /// The `ctime` of the item that was rejected.
    pub ctime: i64,
    /// The maximum `ctime` already present somewhere in the list.
    pub known_max: i64,
}
