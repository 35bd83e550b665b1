use super::staleness::{decide, Staleness, DEFAULT_STALE_THRESHOLD_MS};
use crate::collection_store::CollectionStore;
use crate::remote::CollectionFetcher;
use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Source of "now" in epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Fetched,
    Skipped,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Fetched => write!(f, "fetched"),
            SyncOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Refreshes the local catalog from the remote source when the watermark is
/// older than the staleness threshold.
pub struct SyncCoordinator {
    store: Arc<dyn CollectionStore>,
    fetcher: Arc<dyn CollectionFetcher>,
    stale_threshold_ms: i64,
    clock: Clock,
}

impl SyncCoordinator {
    pub fn new(store: Arc<dyn CollectionStore>, fetcher: Arc<dyn CollectionFetcher>) -> Self {
        Self {
            store,
            fetcher,
            stale_threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
            clock: system_clock(),
        }
    }

    pub fn with_stale_threshold_ms(mut self, stale_threshold_ms: i64) -> Self {
        self.stale_threshold_ms = stale_threshold_ms;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<dyn CollectionStore> {
        &self.store
    }

    pub fn stale_threshold_ms(&self) -> i64 {
        self.stale_threshold_ms
    }

    /// Fetches and stores the remote collection of `username` if the cache is
    /// stale or `force` is set.
    ///
    /// The watermark is set to the time captured before the fetch started, and
    /// only after the entries were committed. Fetch and storage errors are
    /// returned as they are.
    pub async fn sync_if_stale(&self, username: &str, force: bool) -> Result<SyncOutcome> {
        let now = (self.clock)();
        let last_sync = self.store.get_last_sync_timestamp()?;
        let staleness = decide(last_sync, now, self.stale_threshold_ms, force);
        debug!(
            "Last sync: {:?}, now: {}, staleness: {:?}, force: {}",
            last_sync, now, staleness, force
        );

        if staleness == Staleness::Fresh {
            info!("Sync skipped, data is fresh");
            return Ok(SyncOutcome::Skipped);
        }

        let entries = self.fetcher.fetch_user_collection(username).await?;
        self.store.upsert_entries(&entries)?;
        self.store.set_last_sync_timestamp(now)?;
        info!("Synced {} entries for {}", entries.len(), username);
        Ok(SyncOutcome::Fetched)
    }
}
