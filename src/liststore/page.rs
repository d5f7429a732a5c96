//! Index and data page types, wire format, and the magic/version checks
//! guarding them (spec §3/§6).
//!
//! Grounded on `examples/original_source/liststore.py`'s
//! `ListStoreIndexPage`/`ListStoreDataPage` classes for shape, and on
//! `src/compression`'s `CompressionError` for the "one error enum per
//! concern" convention. The wire format is produced by `serde_json`
//! directly against these types — no intermediate DTO — since the
//! `bool_as_u8` serializer makes the derived `Serialize`/`Deserialize`
//! output match §6's literal grammar exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

const INDEX_MAGIC: &str = "ListStoreIndexPage";
const DATA_MAGIC: &str = "ListStoreDataPage";
const PAGE_VERSION: u32 = 1;

mod bool_as_u8 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(if *value { 1 } else { 0 })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}

/// Per-month summary stored in an [`IndexPage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// The month this summary describes.
    pub yyyymm: String,
    /// Number of items in the month's data page.
    pub total: u64,
    /// Count of items with `seen == 1`.
    pub seen: u64,
    /// Count of items with `dismissed == 1`.
    pub dismissed: u64,
    /// Maximum `ctime` across the page's items, or the epoch second of
    /// the first day of `yyyymm` if the page has no items.
    pub ctime_max: i64,
}

impl MonthSummary {
    /// True when every item in the month already has `flag` set — the
    /// condition the flag setter and `reverseScan` use to skip a month
    /// entirely.
    pub fn fully_flagged(&self, flag: super::Flag) -> bool {
        match flag {
            super::Flag::Seen => self.seen == self.total,
            super::Flag::Dismissed => self.dismissed == self.total,
        }
    }
}

/// Maps `yyyymm` to its summary. A list's top-level object-store entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPage {
    magic: String,
    version: u32,
    /// `BTreeMap` keyed by `yyyymm`: no duplicate months are possible by
    /// construction, and iteration order is lexicographic, which §3's
    /// invariant I3 relies on coinciding with chronological order.
    pub ymtab: BTreeMap<String, MonthSummary>,
}

impl IndexPage {
    /// An index page with no months yet recorded.
    pub fn empty() -> Self {
        Self {
            magic: INDEX_MAGIC.to_string(),
            version: PAGE_VERSION,
            ymtab: BTreeMap::new(),
        }
    }

    /// Parse a page from its decompressed JSON bytes. Empty bytes parse
    /// to [`IndexPage::empty`].
    pub fn parse(bytes: &[u8]) -> Result<Self, DataError> {
        if bytes.is_empty() {
            return Ok(Self::empty());
        }
        let page: Self = serde_json::from_slice(bytes)
            .map_err(|e| DataError::Malformed(format!("index page: {e}")))?;
        if page.magic != INDEX_MAGIC {
            return Err(DataError::BadMagic {
                expected: INDEX_MAGIC,
                found: page.magic,
            });
        }
        if page.version != PAGE_VERSION {
            return Err(DataError::BadVersion(page.version));
        }
        Ok(page)
    }

    /// Serialize to the JSON bytes written to the object store and cache.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("IndexPage serialization cannot fail")
    }
}

/// A single item within a [`DataPage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    /// UTC epoch second; unique and strictly ascending within a page.
    pub ctime: i64,
    /// Opaque payload.
    pub content: String,
    /// Informational flag; never hides an item (I7).
    #[serde(with = "bool_as_u8")]
    pub seen: bool,
    /// Hides the item from `retrieve` and, by default, `reverseScan` (I6).
    #[serde(with = "bool_as_u8")]
    pub dismissed: bool,
}

/// The month-sharded data page, ordered ascending by `ctime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage {
    magic: String,
    version: u32,
    /// Strictly ascending by `ctime` (I2).
    pub ctab: Vec<DataItem>,
}

impl DataPage {
    /// A data page with no items.
    pub fn empty() -> Self {
        Self {
            magic: DATA_MAGIC.to_string(),
            version: PAGE_VERSION,
            ctab: Vec::new(),
        }
    }

    /// Parse a page from its decompressed JSON bytes. Empty bytes parse
    /// to [`DataPage::empty`].
    pub fn parse(bytes: &[u8]) -> Result<Self, DataError> {
        if bytes.is_empty() {
            return Ok(Self::empty());
        }
        let page: Self = serde_json::from_slice(bytes)
            .map_err(|e| DataError::Malformed(format!("data page: {e}")))?;
        if page.magic != DATA_MAGIC {
            return Err(DataError::BadMagic {
                expected: DATA_MAGIC,
                found: page.magic,
            });
        }
        if page.version != PAGE_VERSION {
            return Err(DataError::BadVersion(page.version));
        }
        Ok(page)
    }

    /// Serialize to the JSON bytes written to the object store and cache.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("DataPage serialization cannot fail")
    }

    /// Truncate to `total` items, the read-time repair for an
    /// interrupted write described in spec §4.5.
    pub fn truncate_to(&mut self, total: usize) {
        self.ctab.truncate(total);
    }

    /// Binary search for `ctime`, since `ctab` is kept strictly ascending.
    pub fn position_of(&self, ctime: i64) -> Result<usize, usize> {
        self.ctab.binary_search_by_key(&ctime, |item| item.ctime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_page_empty_bytes_parse_to_empty() {
        assert_eq!(IndexPage::parse(&[]).unwrap(), IndexPage::empty());
    }

    #[test]
    fn index_page_round_trips() {
        let mut page = IndexPage::empty();
        page.ymtab.insert(
            "201301".to_string(),
            MonthSummary {
                yyyymm: "201301".to_string(),
                total: 3,
                seen: 1,
                dismissed: 0,
                ctime_max: 1_356_998_400,
            },
        );
        let bytes = page.to_bytes();
        assert_eq!(IndexPage::parse(&bytes).unwrap(), page);
    }

    #[test]
    fn index_page_rejects_bad_magic() {
        let bytes = br#"{"magic":"Nope","version":1,"ymtab":{}}"#;
        match IndexPage::parse(bytes) {
            Err(DataError::BadMagic { expected, found }) => {
                assert_eq!(expected, INDEX_MAGIC);
                assert_eq!(found, "Nope");
            }
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn index_page_rejects_bad_version() {
        let bytes = br#"{"magic":"ListStoreIndexPage","version":2,"ymtab":{}}"#;
        match IndexPage::parse(bytes) {
            Err(DataError::BadVersion(2)) => {}
            other => panic!("expected BadVersion(2), got {other:?}"),
        }
    }

    #[test]
    fn data_page_empty_bytes_parse_to_empty() {
        assert_eq!(DataPage::parse(&[]).unwrap(), DataPage::empty());
    }

    #[test]
    fn data_page_round_trips_and_flags_are_0_1() {
        let mut page = DataPage::empty();
        page.ctab.push(DataItem {
            ctime: 1,
            content: "hello".to_string(),
            seen: true,
            dismissed: false,
        });
        let bytes = page.to_bytes();
        let json = String::from_utf8(bytes.clone()).unwrap();
        assert!(json.contains("\"seen\":1"));
        assert!(json.contains("\"dismissed\":0"));
        assert_eq!(DataPage::parse(&bytes).unwrap(), page);
    }

    #[test]
    fn data_page_rejects_bad_magic() {
        let bytes = br#"{"magic":"Nope","version":1,"ctab":[]}"#;
        assert!(matches!(
            DataPage::parse(bytes),
            Err(DataError::BadMagic { .. })
        ));
    }

    #[test]
    fn truncate_to_repairs_overlong_page() {
        let mut page = DataPage::empty();
        for ctime in 1..=5 {
            page.ctab.push(DataItem {
                ctime,
                content: String::new(),
                seen: false,
                dismissed: false,
            });
        }
        page.truncate_to(3);
        assert_eq!(page.ctab.len(), 3);
        assert_eq!(page.ctab.last().unwrap().ctime, 3);
    }

    #[test]
    fn position_of_finds_existing_and_missing() {
        let mut page = DataPage::empty();
        for ctime in [10, 20, 30] {
            page.ctab.push(DataItem {
                ctime,
                content: String::new(),
                seen: false,
                dismissed: false,
            });
        }
        assert_eq!(page.position_of(20), Ok(1));
        assert_eq!(page.position_of(15), Err(1));
    }
}
