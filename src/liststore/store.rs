//! `ListStore` operations: paging primitives (§4.5) and higher-level ops
//! (§4.6), grounded throughout on
//! `examples/original_source/liststore.py`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::{liststore_key, ByteCache, DEFAULT_TTL};
use crate::compression;
use crate::error::{DataError, NonFutureItemError, Result, StoreError};
use crate::object_store::{ObjectStoreClient, ObjectStoreError};

use super::month;
use super::page::{DataItem, DataPage, IndexPage, MonthSummary};
use super::Flag;

/// Aggregate counters returned by [`ListStore::count`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCounts {
    /// Total items across every month.
    pub total: u64,
    /// Items with `seen == 1`.
    pub seen: u64,
    /// Items with `dismissed == 1`.
    pub dismissed: u64,
}

/// Time-partitioned append-only log. One instance serves every list
/// (`name`) within a single object-store bucket; `bucket` only namespaces
/// cache keys (spec §4.2), it never scopes which lists are reachable.
pub struct ListStore {
    object_store: Arc<dyn ObjectStoreClient>,
    cache: Arc<dyn ByteCache>,
    bucket: String,
}

impl ListStore {
    /// Construct a `ListStore` over the given collaborators. `bucket`
    /// identifies the object-store bucket for cache-key namespacing.
    pub fn new(
        object_store: Arc<dyn ObjectStoreClient>,
        cache: Arc<dyn ByteCache>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            object_store,
            cache,
            bucket: bucket.into(),
        }
    }

    fn index_key(name: &str) -> String {
        format!("{name}.gz")
    }

    fn data_key(name: &str, yyyymm: &str) -> String {
        format!("{name}/{yyyymm}.gz")
    }

    fn map_compression_err(e: compression::CompressionError) -> StoreError {
        StoreError::ObjectStore(ObjectStoreError::Io(format!("compression: {e}")))
    }

    /// Cache-through read of a raw page. A missing object-store key reads
    /// as empty bytes, which both page types parse as empty.
    async fn read_page(&self, key: &str) -> Result<Vec<u8>> {
        let cache_key = liststore_key(&self.bucket, key);

        if let Some(compressed) = self.cache.get(&cache_key).await? {
            return compression::decompress(&compressed).map_err(Self::map_compression_err);
        }

        match self.object_store.get(key).await {
            Ok(compressed) => {
                self.cache
                    .set(&cache_key, compressed.clone(), DEFAULT_TTL)
                    .await?;
                compression::decompress(&compressed).map_err(Self::map_compression_err)
            }
            Err(ObjectStoreError::NotFound(_)) => {
                self.cache.delete(&cache_key).await?;
                Ok(Vec::new())
            }
            Err(other) => Err(StoreError::ObjectStore(other)),
        }
    }

    /// Write-through write of a raw page: object store, then cache.
    async fn write_page(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let compressed = compression::compress(&bytes).map_err(Self::map_compression_err)?;
        self.object_store.put(key, compressed.clone()).await?;
        self.cache
            .set(&liststore_key(&self.bucket, key), compressed, DEFAULT_TTL)
            .await?;
        Ok(())
    }

    async fn read_index_page(&self, name: &str) -> Result<IndexPage> {
        let bytes = self.read_page(&Self::index_key(name)).await?;
        Ok(IndexPage::parse(&bytes)?)
    }

    async fn write_index_page(&self, name: &str, ip: &IndexPage) -> Result<()> {
        self.write_page(&Self::index_key(name), ip.to_bytes()).await
    }

    /// Read `name`'s data page for `yyyymm`. If the index has no summary
    /// for the month, returns an empty page without touching the object
    /// store. Otherwise truncates `ctab` to `summary.total`, repairing
    /// an interrupted write per §4.5.
    async fn read_data_page(&self, name: &str, yyyymm: &str) -> Result<DataPage> {
        let ip = self.read_index_page(name).await?;
        let Some(summary) = ip.ymtab.get(yyyymm) else {
            return Ok(DataPage::empty());
        };

        let bytes = self.read_page(&Self::data_key(name, yyyymm)).await?;
        let mut dp = DataPage::parse(&bytes)?;
        dp.truncate_to(summary.total as usize);
        Ok(dp)
    }

    fn derive_summary(yyyymm: &str, dp: &DataPage) -> MonthSummary {
        let total = dp.ctab.len() as u64;
        let seen = dp.ctab.iter().filter(|item| item.seen).count() as u64;
        let dismissed = dp.ctab.iter().filter(|item| item.dismissed).count() as u64;
        let ctime_max = dp
            .ctab
            .last()
            .map(|item| item.ctime)
            .unwrap_or_else(|| month::first_of_month_epoch(yyyymm));
        MonthSummary {
            yyyymm: yyyymm.to_string(),
            total,
            seen,
            dismissed,
            ctime_max,
        }
    }

    /// Write `dp` for `yyyymm`, recomputing and inserting its summary
    /// into the index. Writes the data page first, then the index —
    /// reversing this order would let a crash leave the index
    /// referencing items that were never durably written.
    async fn write_data_page(&self, name: &str, yyyymm: &str, dp: &DataPage) -> Result<()> {
        let mut ip = self.read_index_page(name).await?;
        let summary = Self::derive_summary(yyyymm, dp);
        ip.ymtab.insert(yyyymm.to_string(), summary);

        self.write_page(&Self::data_key(name, yyyymm), dp.to_bytes())
            .await?;
        self.write_index_page(name, &ip).await?;
        Ok(())
    }

    /// Months present in the index at or before `target_yyyymm`, walked
    /// in descending order. Equivalent to the original's
    /// `bisect_left`-then-step-back month resolution: when
    /// `target_yyyymm` itself has no entry, the walk starts from the
    /// nearest earlier month instead of skipping straight past it.
    fn descending_months_at_or_before(ip: &IndexPage, target_yyyymm: &str) -> Vec<String> {
        ip.ymtab
            .range(..=target_yyyymm.to_string())
            .rev()
            .map(|(yyyymm, _)| yyyymm.clone())
            .collect()
    }

    /// Append `rows` (`(ctime, content)` pairs) to `name`, grouping by
    /// month and applying each month's group in ascending `yyyymm` order.
    pub async fn append(&self, name: &str, rows: &[(i64, String)]) -> Result<()> {
        let mut groups: BTreeMap<String, Vec<(i64, String)>> = BTreeMap::new();
        for (ctime, content) in rows {
            groups
                .entry(month::yyyymm(*ctime))
                .or_default()
                .push((*ctime, content.clone()));
        }

        for (yyyymm, mut group) in groups {
            group.sort_by_key(|(ctime, _)| *ctime);
            self.append_month(name, &yyyymm, group).await?;
        }
        Ok(())
    }

    async fn append_month(&self, name: &str, yyyymm: &str, group: Vec<(i64, String)>) -> Result<()> {
        let min_ctime = group
            .first()
            .map(|(ctime, _)| *ctime)
            .expect("append_month called with an empty group");

        // I5 is enforced against every month's ctime_max, not just the
        // target month's — an append into an earlier-lexicographic month
        // must not resurrect a ctime already superseded elsewhere.
        let ip = self.read_index_page(name).await?;
        for summary in ip.ymtab.values() {
            if summary.total > 0 && summary.ctime_max >= min_ctime {
                return Err(StoreError::Data(DataError::NonFutureItem(
                    NonFutureItemError {
                        ctime: min_ctime,
                        known_max: summary.ctime_max,
                    },
                )));
            }
        }

        let mut dp = self.read_data_page(name, yyyymm).await?;
        if let Some(last) = dp.ctab.last() {
            if last.ctime >= min_ctime {
                return Err(StoreError::Data(DataError::NonFutureItem(
                    NonFutureItemError {
                        ctime: min_ctime,
                        known_max: last.ctime,
                    },
                )));
            }
        }

        for (ctime, content) in group {
            dp.ctab.push(DataItem {
                ctime,
                content,
                seen: false,
                dismissed: false,
            });
        }
        self.write_data_page(name, yyyymm, &dp).await
    }

    /// Look up `ctime` in `name`. Returns `None` if absent or dismissed.
    pub async fn retrieve(&self, name: &str, ctime: i64) -> Result<Option<DataItem>> {
        let yyyymm = month::yyyymm(ctime);
        let ip = self.read_index_page(name).await?;
        let Some(summary) = ip.ymtab.get(&yyyymm) else {
            return Ok(None);
        };
        if summary.total == summary.dismissed {
            return Ok(None);
        }

        let dp = self.read_data_page(name, &yyyymm).await?;
        match dp.position_of(ctime) {
            Ok(idx) => {
                let item = &dp.ctab[idx];
                if item.dismissed {
                    Ok(None)
                } else {
                    Ok(Some(item.clone()))
                }
            }
            Err(_) => Ok(None),
        }
    }

    /// Remove `ctime` from `name`, if present. Missing items are a no-op.
    pub async fn delete(&self, name: &str, ctime: i64) -> Result<()> {
        let yyyymm = month::yyyymm(ctime);
        let mut dp = self.read_data_page(name, &yyyymm).await?;
        if let Ok(idx) = dp.position_of(ctime) {
            dp.ctab.remove(idx);
            self.write_data_page(name, &yyyymm, &dp).await?;
        }
        Ok(())
    }

    /// Set the `seen` flag on `ctime`, and on every item chronologically
    /// at or before it when `prior` is true.
    pub async fn set_seen(&self, name: &str, ctime: i64, prior: bool) -> Result<()> {
        self.set_flag(name, ctime, prior, Flag::Seen).await
    }

    /// Set the `dismissed` flag on `ctime`, and on every item
    /// chronologically at or before it when `prior` is true.
    pub async fn set_dismissed(&self, name: &str, ctime: i64, prior: bool) -> Result<()> {
        self.set_flag(name, ctime, prior, Flag::Dismissed).await
    }

    fn flag_value(item: &DataItem, flag: Flag) -> bool {
        match flag {
            Flag::Seen => item.seen,
            Flag::Dismissed => item.dismissed,
        }
    }

    fn set_flag_value(item: &mut DataItem, flag: Flag) {
        match flag {
            Flag::Seen => item.seen = true,
            Flag::Dismissed => item.dismissed = true,
        }
    }

    /// Modifications run newest-item-first: a crash mid-operation leaves
    /// a contiguous newer suffix flagged, which is invariant-preserving
    /// but incomplete. Since the operation only ever sets bits, clients
    /// may safely re-issue `prior=true` to finish the job.
    async fn set_flag(&self, name: &str, ctime: i64, prior: bool, flag: Flag) -> Result<()> {
        let target_yyyymm = month::yyyymm(ctime);

        if !prior {
            let mut dp = self.read_data_page(name, &target_yyyymm).await?;
            if let Ok(idx) = dp.position_of(ctime) {
                if !Self::flag_value(&dp.ctab[idx], flag) {
                    Self::set_flag_value(&mut dp.ctab[idx], flag);
                    self.write_data_page(name, &target_yyyymm, &dp).await?;
                }
            }
            return Ok(());
        }

        let ip = self.read_index_page(name).await?;
        let months = Self::descending_months_at_or_before(&ip, &target_yyyymm);

        for yyyymm in months {
            let summary = ip.ymtab.get(&yyyymm).expect("yyyymm came from ip.ymtab");
            if summary.fully_flagged(flag) {
                continue;
            }

            let mut dp = self.read_data_page(name, &yyyymm).await?;
            if dp.ctab.is_empty() {
                continue;
            }

            let start_idx = if yyyymm == target_yyyymm {
                match dp.position_of(ctime) {
                    Ok(idx) => idx,
                    Err(0) => continue, // nothing in this month is <= ctime
                    Err(insert_at) => insert_at - 1,
                }
            } else {
                dp.ctab.len() - 1
            };

            let mut changed = false;
            for idx in (0..=start_idx).rev() {
                if !Self::flag_value(&dp.ctab[idx], flag) {
                    Self::set_flag_value(&mut dp.ctab[idx], flag);
                    changed = true;
                }
            }
            if changed {
                self.write_data_page(name, &yyyymm, &dp).await?;
            }
        }
        Ok(())
    }

    /// Walk `name` backward from `ctime`, emitting at most `limit` items
    /// in strictly descending `ctime` order. `offset` items that would
    /// otherwise be emitted are skipped first. `skip_seen`/
    /// `skip_dismissed` filter items with the corresponding flag set;
    /// spec defaults are `skip_seen = false`, `skip_dismissed = true`.
    pub async fn reverse_scan(
        &self,
        name: &str,
        ctime: i64,
        limit: usize,
        offset: usize,
        skip_seen: bool,
        skip_dismissed: bool,
    ) -> Result<Vec<DataItem>> {
        let target_yyyymm = month::yyyymm(ctime);
        let ip = self.read_index_page(name).await?;
        let months = Self::descending_months_at_or_before(&ip, &target_yyyymm);

        let mut skipped = 0usize;
        let mut results = Vec::new();

        for yyyymm in months {
            if results.len() >= limit {
                break;
            }

            let summary = ip.ymtab.get(&yyyymm).expect("yyyymm came from ip.ymtab");
            let month_fully_filtered = (skip_dismissed && summary.total == summary.dismissed)
                || (skip_seen && summary.total == summary.seen);
            if month_fully_filtered {
                continue;
            }

            let dp = self.read_data_page(name, &yyyymm).await?;
            if dp.ctab.is_empty() {
                continue;
            }

            let start_idx = if yyyymm == target_yyyymm {
                match dp.position_of(ctime) {
                    Ok(idx) => idx,
                    Err(0) => continue,
                    Err(insert_at) => insert_at - 1,
                }
            } else {
                dp.ctab.len() - 1
            };

            for idx in (0..=start_idx).rev() {
                let item = &dp.ctab[idx];
                if skip_seen && item.seen {
                    continue;
                }
                if skip_dismissed && item.dismissed {
                    continue;
                }
                if skipped < offset {
                    skipped += 1;
                    continue;
                }
                results.push(item.clone());
                if results.len() >= limit {
                    break;
                }
            }
        }
        Ok(results)
    }

    /// Sum the index page's per-month summaries. Never touches data
    /// pages.
    pub async fn count(&self, name: &str) -> Result<ListCounts> {
        let ip = self.read_index_page(name).await?;
        let mut counts = ListCounts::default();
        for summary in ip.ymtab.values() {
            counts.total += summary.total;
            counts.seen += summary.seen;
            counts.dismissed += summary.dismissed;
        }
        Ok(counts)
    }

    /// Delete every object-store key under `name` (the index and every
    /// month's data page), then clear the cache for `name`.
    pub async fn delete_name(&self, name: &str) -> Result<()> {
        let keys = self.object_store.list(name).await?;
        for key in keys {
            self.object_store.delete(&key).await?;
        }
        self.clear_cache(name).await
    }

    /// Evict `name`'s cache entries (the index key and every month-shard
    /// key) without touching durable state. Subsequent reads repopulate
    /// the cache from the object store.
    pub async fn clear_cache(&self, name: &str) -> Result<()> {
        let index_cache_key = liststore_key(&self.bucket, &Self::index_key(name));
        self.cache.delete(&index_cache_key).await?;

        let data_pattern = liststore_key(&self.bucket, &format!("{name}/*.gz"));
        for key in self.cache.keys(&data_pattern).await? {
            self.cache.delete(&key).await?;
        }
        Ok(())
    }
}
