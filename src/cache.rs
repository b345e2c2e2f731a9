use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::asset::Snapshot;

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: Arc<Snapshot>,
    stored_at: Instant,
}

/// Last successful snapshot plus the instant it was stored.
///
/// Owned by whoever drives refresh cycles and handed to them explicitly. An
/// entry is replaced wholesale on publish and is never patched in place.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// The cached snapshot, if it is younger than the ttl at `now`.
    pub fn fresh(&self, now: Instant) -> Option<Arc<Snapshot>> {
        let entry = self.entry.as_ref()?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            Some(entry.snapshot.clone())
        } else {
            None
        }
    }

    pub fn publish(&mut self, snapshot: Snapshot, now: Instant) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.entry = Some(CacheEntry {
            snapshot: snapshot.clone(),
            stored_at: now,
        });
        snapshot
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            tracing::debug!("Snapshot cache invalidated");
        }
    }

    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.entry
            .as_ref()
            .map(|entry| now.saturating_duration_since(entry.stored_at))
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
