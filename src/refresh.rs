use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::cache::SnapshotCache;
use crate::coingecko::CoinGeckoRestClient;
use crate::error::AppError;
use crate::event::AppEvent;
use crate::model::asset::Snapshot;
use crate::model::signal::SignalTable;
use crate::pipeline;

/// Anything that can produce a fresh market snapshot.
pub trait MarketSource {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, AppError>> + Send;
}

impl MarketSource for CoinGeckoRestClient {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, AppError>> + Send {
        CoinGeckoRestClient::fetch_snapshot(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Scheduled,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub table: Arc<SignalTable>,
    pub fetched_at: DateTime<Utc>,
    pub from_cache: bool,
    pub trigger: Trigger,
}

/// Run one fetch -> score cycle.
///
/// A manual trigger drops the cached snapshot first so the source is always
/// hit. Otherwise a snapshot younger than the cache ttl is reused. The cache
/// only changes on a successful fetch.
pub async fn run_cycle<S: MarketSource>(
    source: &S,
    cache: &mut SnapshotCache,
    trigger: Trigger,
    now: Instant,
) -> Result<RefreshReport, AppError> {
    if trigger == Trigger::Manual {
        cache.invalidate();
    }

    let (snapshot, from_cache) = match cache.fresh(now) {
        Some(snapshot) => (snapshot, true),
        None => {
            let fetched = source.fetch_snapshot().await?;
            (cache.publish(fetched, now), false)
        }
    };

    let table = pipeline::compute(snapshot.assets())?;
    Ok(RefreshReport {
        table: Arc::new(table),
        fetched_at: snapshot.fetched_at(),
        from_cache,
        trigger,
    })
}

/// Owns the source and cache and runs refresh cycles one at a time.
pub struct RefreshWorker<S> {
    source: S,
    cache: SnapshotCache,
    interval: Duration,
}

impl<S> RefreshWorker<S>
where
    S: MarketSource + Send + Sync + 'static,
{
    pub fn new(source: S, cache: SnapshotCache, interval: Duration) -> Self {
        Self {
            source,
            cache,
            interval,
        }
    }

    /// Startup cycle, then scheduled and manual cycles until shutdown.
    ///
    /// Cycles never overlap: the select only resumes after the previous cycle
    /// finished. Missed ticks are skipped and queued manual requests collapse
    /// into a single cycle.
    pub async fn run(
        mut self,
        mut manual_rx: mpsc::Receiver<()>,
        app_tx: mpsc::Sender<AppEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; the startup cycle stands in for it.
        ticker.tick().await;
        self.cycle(Trigger::Startup, &app_tx).await;

        loop {
            let trigger = tokio::select! {
                _ = ticker.tick() => Trigger::Scheduled,
                request = manual_rx.recv() => match request {
                    Some(()) => Trigger::Manual,
                    None => break,
                },
                _ = shutdown_rx.changed() => break,
            };

            if trigger == Trigger::Manual {
                let mut coalesced = 0usize;
                while manual_rx.try_recv().is_ok() {
                    coalesced += 1;
                }
                if coalesced > 0 {
                    tracing::debug!(coalesced, "Collapsed queued manual refreshes");
                    let _ = app_tx
                        .send(AppEvent::LogMessage(format!(
                            "{} extra refresh requests merged",
                            coalesced
                        )))
                        .await;
                }
                ticker.reset();
            }

            self.cycle(trigger, &app_tx).await;
            if app_tx.is_closed() {
                break;
            }
        }
        tracing::info!("Refresh worker stopped");
    }

    async fn cycle(&mut self, trigger: Trigger, app_tx: &mpsc::Sender<AppEvent>) {
        let _ = app_tx.send(AppEvent::RefreshStarted(trigger)).await;

        let event = match run_cycle(&self.source, &mut self.cache, trigger, Instant::now()).await {
            Ok(report) => {
                tracing::info!(
                    trigger = %trigger,
                    assets = report.table.len(),
                    high = report.table.high_signal_count(),
                    from_cache = report.from_cache,
                    "Refresh cycle complete"
                );
                AppEvent::SignalsReady(report)
            }
            Err(AppError::DataUnavailable(reason)) => {
                tracing::warn!(trigger = %trigger, reason = %reason, "Market data unavailable");
                AppEvent::DataUnavailable { trigger, reason }
            }
            Err(e) => {
                tracing::error!(trigger = %trigger, error = %e, "Refresh cycle failed");
                AppEvent::Error(e.to_string())
            }
        };
        let _ = app_tx.send(event).await;
    }
}
