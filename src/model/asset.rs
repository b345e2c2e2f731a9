use chrono::{DateTime, Utc};
use serde::Serialize;

/// One asset's raw market metrics for a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSnapshot {
    pub ticker: String,
    pub price_change_1d_pct: f64,
    pub price_change_1w_pct: f64,
    pub volume: f64,
}

impl AssetSnapshot {
    pub fn new(
        ticker: impl Into<String>,
        price_change_1d_pct: f64,
        price_change_1w_pct: f64,
        volume: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            price_change_1d_pct,
            price_change_1w_pct,
            volume,
        }
    }
}

/// A validated, non-empty batch of asset rows from one fetch.
///
/// Built only by the ingestion adapter (or tests); never mutated after that.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    assets: Vec<AssetSnapshot>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Returns `None` for an empty batch, which is never a valid snapshot.
    pub fn new(assets: Vec<AssetSnapshot>, fetched_at: DateTime<Utc>) -> Option<Self> {
        if assets.is_empty() {
            return None;
        }
        Some(Self { assets, fetched_at })
    }

    pub fn assets(&self) -> &[AssetSnapshot] {
        &self.assets
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
