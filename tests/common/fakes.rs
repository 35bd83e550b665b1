use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use vinyl_cache::collection_store::{CatalogEntry, CollectionStore, NewCatalogEntry};
use vinyl_cache::remote::{CollectionFetcher, FetchError};

/// In-process remote collection.
///
/// The returned entries can be swapped between syncs. When gated, every fetch
/// waits for [`FakeFetcher::release`] before answering.
pub struct FakeFetcher {
    entries: Mutex<Vec<NewCatalogEntry>>,
    fail_with_status: Mutex<Option<u16>>,
    gate: Option<Notify>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn returning(entries: Vec<NewCatalogEntry>) -> Arc<Self> {
        Arc::new(Self::build(entries, None))
    }

    pub fn gated(entries: Vec<NewCatalogEntry>) -> Arc<Self> {
        Arc::new(Self::build(entries, Some(Notify::new())))
    }

    fn build(entries: Vec<NewCatalogEntry>, gate: Option<Notify>) -> Self {
        Self {
            entries: Mutex::new(entries),
            fail_with_status: Mutex::new(None),
            gate,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_entries(&self, entries: Vec<NewCatalogEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    pub fn fail_with(&self, status: Option<u16>) {
        *self.fail_with_status.lock().unwrap() = status;
    }

    /// Lets one waiting (or the next) gated fetch proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionFetcher for FakeFetcher {
    async fn fetch_user_collection(
        &self,
        username: &str,
    ) -> Result<Vec<NewCatalogEntry>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(status) = *self.fail_with_status.lock().unwrap() {
            return Err(FetchError::Http {
                url: format!("fake://users/{}/collection", username),
                status,
            });
        }
        Ok(self.entries.lock().unwrap().clone())
    }
}

/// Counts every call that reaches the wrapped store.
pub struct CountingStore {
    inner: Arc<dyn CollectionStore>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn wrap(inner: Arc<dyn CollectionStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl CollectionStore for CountingStore {
    fn ensure_ready(&self) -> Result<()> {
        self.hit();
        self.inner.ensure_ready()
    }

    fn upsert_entries(&self, entries: &[NewCatalogEntry]) -> Result<usize> {
        self.hit();
        self.inner.upsert_entries(entries)
    }

    fn list_all_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.hit();
        self.inner.list_all_entries()
    }

    fn count_entries(&self) -> Result<usize> {
        self.hit();
        self.inner.count_entries()
    }

    fn get_entry_by_external_id(&self, external_id: i64) -> Result<Option<CatalogEntry>> {
        self.hit();
        self.inner.get_entry_by_external_id(external_id)
    }

    fn get_last_sync_timestamp(&self) -> Result<Option<i64>> {
        self.hit();
        self.inner.get_last_sync_timestamp()
    }

    fn set_last_sync_timestamp(&self, timestamp_ms: i64) -> Result<()> {
        self.hit();
        self.inner.set_last_sync_timestamp(timestamp_ms)
    }

    fn reset(&self) -> Result<()> {
        self.hit();
        self.inner.reset()
    }
}
