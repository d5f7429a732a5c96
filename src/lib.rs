//! # pagedstore
//!
//! A durable, cache-through key-addressable store with two cooperating
//! services:
//!
//! - [`docstore::DocStore`] — a flat blob namespace keyed by `(path, id)`:
//!   put / get / delete / list, with compressed storage and cache-through.
//! - [`liststore::ListStore`] — a time-partitioned append-only log keyed
//!   by `name`, sharded into monthly data pages addressed by a summary
//!   index page. Supports append, point retrieve, delete, per-item flag
//!   mutation with back-fill, reverse chronological scan, count, and bulk
//!   deletion.
//!
//! Both sit on top of two external collaborators supplied at
//! construction — [`object_store::ObjectStoreClient`] (the durable,
//! authoritative backend) and [`cache::ByteCache`] (a fast, TTL-bounded
//! read/write-through cache) — and one fixed codec, gzip framing, in
//! [`compression`].
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pagedstore::cache::InMemoryCache;
//! use pagedstore::object_store::InMemoryObjectStore;
//! use pagedstore::docstore::DocStore;
//!
//! # async fn run() -> pagedstore::error::Result<()> {
//! let object_store = Arc::new(InMemoryObjectStore::new());
//! let cache = Arc::new(InMemoryCache::new());
//! let docs = DocStore::new(object_store, cache);
//!
//! docs.put("reports", "q1", b"quarterly numbers").await?;
//! assert_eq!(docs.get("reports", "q1").await?.as_deref(), Some(&b"quarterly numbers"[..]));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod compression;
pub mod config;
pub mod docstore;
pub mod error;
pub mod liststore;
pub mod object_store;

pub use config::{CacheConfig, ObjectStoreConfig, StoreConfig};
pub use docstore::DocStore;
pub use error::{DataError, NonFutureItemError, Result, StoreError};
pub use liststore::{DataItem, Flag, ListCounts, ListStore};

/// Crate version, as set in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name, as set in `Cargo.toml`.
pub const NAME: &str = env!("CARGO_PKG_NAME");
