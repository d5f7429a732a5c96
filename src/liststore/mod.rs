//! ListStore — a time-partitioned append-only log keyed by `name` (spec §4.6).
//!
//! Grounded on `examples/original_source/liststore.py` for operation
//! semantics and on `enterprise::eventsource::store`'s append-only log
//! shape for the Rust collaborator wiring.

mod month;
mod page;
mod store;

pub use page::{DataItem, DataPage, IndexPage, MonthSummary};
pub use store::{ListCounts, ListStore};

/// Which per-item flag an operation mutates. `Seen` is purely
/// informational (I7); `Dismissed` hides the item from `retrieve` and,
/// by default, `reverse_scan` (I6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Informational; never hides an item.
    Seen,
    /// Hides the item from `retrieve` and default `reverse_scan`.
    Dismissed,
}
