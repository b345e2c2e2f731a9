use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use breakout_dashboard::cache::SnapshotCache;
use breakout_dashboard::model::asset::{AssetSnapshot, Snapshot};

fn snapshot(ticker: &str) -> Snapshot {
    Snapshot::new(vec![AssetSnapshot::new(ticker, 1.0, 2.0, 3.0)], Utc::now()).unwrap()
}

#[test]
fn empty_cache_has_nothing_fresh() {
    let cache = SnapshotCache::new(Duration::from_secs(300));
    assert!(cache.is_empty());
    assert!(cache.fresh(Instant::now()).is_none());
    assert!(cache.age(Instant::now()).is_none());
}

#[test]
fn entry_is_fresh_until_ttl_elapses() {
    let t0 = Instant::now();
    let mut cache = SnapshotCache::new(Duration::from_secs(300));
    cache.publish(snapshot("BTC"), t0);

    assert!(cache.fresh(t0).is_some());
    assert!(cache.fresh(t0 + Duration::from_secs(299)).is_some());
    assert!(cache.fresh(t0 + Duration::from_secs(300)).is_none());
    assert_eq!(cache.age(t0 + Duration::from_secs(42)), Some(Duration::from_secs(42)));
}

#[test]
fn publish_replaces_previous_entry_wholesale() {
    let t0 = Instant::now();
    let mut cache = SnapshotCache::new(Duration::from_secs(60));
    let first = cache.publish(snapshot("BTC"), t0);
    let second = cache.publish(snapshot("ETH"), t0 + Duration::from_secs(10));

    let fresh = cache.fresh(t0 + Duration::from_secs(65)).unwrap();
    assert!(Arc::ptr_eq(&fresh, &second));
    assert_eq!(fresh.assets()[0].ticker, "ETH");
    // Earlier holders keep their own immutable copy.
    assert_eq!(first.assets()[0].ticker, "BTC");
}

#[test]
fn invalidate_drops_the_entry() {
    let t0 = Instant::now();
    let mut cache = SnapshotCache::new(Duration::from_secs(300));
    cache.publish(snapshot("BTC"), t0);
    cache.invalidate();
    assert!(cache.is_empty());
    assert!(cache.fresh(t0).is_none());
}

#[test]
fn empty_snapshot_cannot_be_built() {
    assert!(Snapshot::new(Vec::new(), Utc::now()).is_none());
}
