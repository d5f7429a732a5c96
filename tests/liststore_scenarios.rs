//! End-to-end coverage of the six concrete scenarios a paged list store
//! must satisfy, run against the in-memory collaborators.

use std::sync::Arc;

use pagedstore::cache::InMemoryCache;
use pagedstore::liststore::ListStore;
use pagedstore::object_store::InMemoryObjectStore;

const DAY: i64 = 86_400;

fn day(d: i64) -> i64 {
    // 2013-01-01T00:00:00Z
    1_356_998_400 + (d - 1) * DAY
}

fn new_store() -> ListStore {
    ListStore::new(
        Arc::new(InMemoryObjectStore::new()),
        Arc::new(InMemoryCache::new()),
        "scenario-bucket",
    )
}

#[tokio::test]
async fn scenario_1_insert_365_days_in_cycling_batches() {
    let store = new_store();
    let batch_sizes = [1usize, 2, 4, 8, 16, 32, 64];
    let mut d = 1i64;
    let mut batch_idx = 0;

    while d <= 365 {
        let size = batch_sizes[batch_idx % batch_sizes.len()];
        let mut rows = Vec::new();
        for _ in 0..size {
            if d > 365 {
                break;
            }
            rows.push((day(d), format!("day {d}")));
            d += 1;
        }
        if !rows.is_empty() {
            store.append("L", &rows).await.unwrap();
        }
        batch_idx += 1;
    }

    let counts = store.count("L").await.unwrap();
    assert_eq!(counts.total, 365);
    assert_eq!(counts.seen, 0);
    assert_eq!(counts.dismissed, 0);
}

async fn insert_full_year(store: &ListStore) {
    let rows: Vec<(i64, String)> = (1..=365).map(|d| (day(d), format!("day {d}"))).collect();
    store.append("L", &rows).await.unwrap();
}

#[tokio::test]
async fn scenario_2_set_dismissed_single_item_hides_only_that_item() {
    let store = new_store();
    insert_full_year(&store).await;

    let mar31 = day(90);
    store.set_dismissed("L", mar31, false).await.unwrap();

    assert_eq!(store.retrieve("L", mar31).await.unwrap(), None);
    assert!(store.retrieve("L", mar31 - DAY).await.unwrap().is_some());
}

#[tokio::test]
async fn scenario_3_set_dismissed_prior_true_backfills() {
    let store = new_store();
    insert_full_year(&store).await;

    let feb14 = day(45);
    let jan10 = day(10);
    store.set_dismissed("L", feb14, true).await.unwrap();

    assert_eq!(store.retrieve("L", jan10).await.unwrap(), None);
    assert_eq!(store.retrieve("L", feb14).await.unwrap(), None);
    assert!(store.retrieve("L", feb14 + DAY).await.unwrap().is_some());
}

async fn build_scenario_4_state(store: &ListStore) {
    insert_full_year(store).await;
    let mar31 = day(90);
    let feb14 = day(45);
    let jun1 = day(152);
    let mar14 = day(73);

    store.set_dismissed("L", mar31, false).await.unwrap();
    store.set_dismissed("L", feb14, true).await.unwrap();
    store.set_seen("L", jun1, false).await.unwrap();
    store.set_seen("L", mar14, true).await.unwrap();
}

#[tokio::test]
async fn scenario_4_combined_dismissed_and_seen_state() {
    let store = new_store();
    build_scenario_4_state(&store).await;

    let feb14 = day(45);
    let mar31 = day(90);
    let mar14 = day(73);
    let jun1 = day(152);

    for d in 1..=365i64 {
        let t = day(d);
        let got = store.retrieve("L", t).await.unwrap();
        if t <= feb14 || t == mar31 {
            assert_eq!(got, None, "day {d} should be hidden");
        } else if t <= mar14 || t == jun1 {
            assert!(got.unwrap().seen, "day {d} should be seen");
        } else {
            assert!(!got.unwrap().seen, "day {d} should not be seen");
        }
    }

    let counts = store.count("L").await.unwrap();
    assert_eq!(counts.total, 365);
    assert_eq!(counts.seen, 74);
    assert_eq!(counts.dismissed, 46);
}

#[tokio::test]
async fn scenario_5_reverse_scan_descends_and_respects_flags() {
    let store = new_store();
    build_scenario_4_state(&store).await;

    let aug23 = day(235);
    let feb14 = day(45);
    let mar31 = day(90);
    let mar14 = day(73);
    let jun1 = day(152);

    let items = store
        .reverse_scan("L", aug23, 300, 0, false, true)
        .await
        .unwrap();

    let mut prev = i64::MAX;
    for item in &items {
        assert!(item.ctime < prev, "items must be strictly descending");
        prev = item.ctime;
        assert_ne!(item.ctime, mar31, "dismissed item must be skipped");
        let expect_seen = item.ctime <= mar14 || item.ctime == jun1;
        assert_eq!(item.seen, expect_seen, "ctime {}", item.ctime);
    }

    assert_eq!(items.last().unwrap().ctime, feb14 + DAY);
}

#[tokio::test]
async fn scenario_6_clear_cache_then_repeat_scenario_4_retrievals() {
    let store = new_store();
    build_scenario_4_state(&store).await;

    store.clear_cache("L").await.unwrap();

    let feb14 = day(45);
    let mar31 = day(90);
    let mar14 = day(73);
    let jun1 = day(152);

    for d in 1..=365i64 {
        let t = day(d);
        let got = store.retrieve("L", t).await.unwrap();
        if t <= feb14 || t == mar31 {
            assert_eq!(got, None, "day {d} should be hidden after cache clear");
        } else if t <= mar14 || t == jun1 {
            assert!(got.unwrap().seen, "day {d} should be seen after cache clear");
        } else {
            assert!(!got.unwrap().seen, "day {d} should not be seen after cache clear");
        }
    }
}
