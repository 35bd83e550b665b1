use crate::collection_store::CatalogEntry;
use crate::queue_store::{QueueEntry, QueueStore};
use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

pub const ALREADY_QUEUED_ERROR: &str = "This record is already in your queue";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub queue: Vec<QueueEntry>,
    pub queue_count: usize,
    pub loading: bool,
    pub error: Option<String>,
}

/// Queue state shared by every view, with at most one queue entry per
/// catalog entry.
pub struct QueueSession {
    store: Arc<dyn QueueStore>,
    state: Mutex<QueueSnapshot>,
}

impl QueueSession {
    pub fn new(store: Arc<dyn QueueStore>) -> Self {
        Self {
            store,
            state: Mutex::new(QueueSnapshot::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fail(&self, action: &str, err: anyhow::Error) {
        error!("Error {}: {:#}", action, err);
        self.state().error = Some(format!("{:#}", err));
    }

    fn load(&self) -> Result<(Vec<QueueEntry>, usize)> {
        let queue = self.store.list_queue()?;
        let count = self.store.get_queue_count()?;
        Ok((queue, count))
    }

    /// Re-reads the queue from storage. Returns false and sets `error` on failure.
    pub fn refresh_queue(&self) -> bool {
        {
            let mut state = self.state();
            state.loading = true;
            state.error = None;
        }
        let result = self.load();
        let mut state = self.state();
        state.loading = false;
        match result {
            Ok((queue, count)) => {
                state.queue = queue;
                state.queue_count = count;
                info!("Queue refreshed: {} items", count);
                true
            }
            Err(e) => {
                drop(state);
                self.fail("refreshing queue", e);
                false
            }
        }
    }

    /// Appends `entry` unless it is already queued. Returns true if it was added.
    pub fn add_to_queue(&self, entry: &CatalogEntry) -> bool {
        self.clear_error();
        match self.store.is_in_queue(entry.id) {
            Ok(true) => {
                self.state().error = Some(ALREADY_QUEUED_ERROR.to_string());
                return false;
            }
            Ok(false) => {}
            Err(e) => {
                self.fail("adding to queue", e);
                return false;
            }
        }
        if let Err(e) = self.store.add_to_queue(entry) {
            self.fail("adding to queue", e);
            return false;
        }
        self.refresh_queue()
    }

    pub fn remove_from_queue(&self, queue_id: i64) -> bool {
        self.clear_error();
        if let Err(e) = self.store.remove_from_queue(queue_id) {
            self.fail("removing from queue", e);
            return false;
        }
        self.refresh_queue()
    }

    /// Returns the number of removed entries, `None` on failure.
    pub fn clear_queue(&self) -> Option<usize> {
        self.clear_error();
        match self.store.clear_queue() {
            Ok(removed) => {
                let mut state = self.state();
                state.queue.clear();
                state.queue_count = 0;
                Some(removed)
            }
            Err(e) => {
                self.fail("clearing queue", e);
                None
            }
        }
    }

    /// Storage failures are logged and reported as "not queued".
    pub fn is_in_queue(&self, record_id: i64) -> bool {
        self.store.is_in_queue(record_id).unwrap_or_else(|e| {
            error!("Error checking queue: {:#}", e);
            false
        })
    }

    pub fn clear_error(&self) {
        self.state().error = None;
    }

    pub fn queue(&self) -> Vec<QueueEntry> {
        self.state().queue.clone()
    }

    pub fn queue_count(&self) -> usize {
        self.state().queue_count
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.state().clone()
    }
}
