//! Shared state holder for the loaded collection.
//!
//! One [`CollectionSession`] is shared by every view. It turns storage and
//! network failures into an `error` string and collapses duplicate loads:
//!
//! - a load for a `(username, force)` pair that is already running returns
//!   immediately;
//! - a non-forced load for the user whose collection is already loaded is a
//!   no-op.

use super::selection::pick_random;
use crate::collection_store::CatalogEntry;
use crate::sync::{SyncCoordinator, SyncOutcome};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

pub const EMPTY_USERNAME_ERROR: &str = "Username is required to load collection";
const GENERIC_LOAD_ERROR: &str = "Failed to load collection";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Storage was initialized, synced and re-read.
    Loaded(SyncOutcome),
    AlreadyInFlight,
    /// The requested user's collection was already loaded.
    CacheHit,
    Failed,
    Rejected,
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSnapshot {
    pub records: Vec<CatalogEntry>,
    pub loading: bool,
    pub error: Option<String>,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LoadKey {
    username: String,
    force: bool,
}

#[derive(Default)]
struct SessionState {
    records: Vec<CatalogEntry>,
    error: Option<String>,
    initialized: bool,
    in_flight: HashSet<LoadKey>,
    last_loaded_username: Option<String>,
}

pub struct CollectionSession {
    coordinator: Arc<SyncCoordinator>,
    state: Mutex<SessionState>,
}

/// Removes its key from the in-flight set when the load ends, however it ends.
struct InFlightGuard<'a> {
    session: &'a CollectionSession,
    key: LoadKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.state().in_flight.remove(&self.key);
    }
}

impl CollectionSession {
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self {
            coordinator,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn load_collection(&self, username: &str, force: bool) -> LoadOutcome {
        if username.trim().is_empty() {
            self.state().error = Some(EMPTY_USERNAME_ERROR.to_string());
            return LoadOutcome::Rejected;
        }

        let key = LoadKey {
            username: username.to_string(),
            force,
        };
        {
            let mut state = self.state();
            if state.in_flight.contains(&key) {
                debug!("Load for {} (force: {}) already in progress", username, force);
                return LoadOutcome::AlreadyInFlight;
            }
            if !force
                && state.initialized
                && !state.records.is_empty()
                && state.last_loaded_username.as_deref() == Some(username)
            {
                debug!("Collection for {} already loaded", username);
                return LoadOutcome::CacheHit;
            }
            state.in_flight.insert(key.clone());
            state.error = None;
        }
        let _guard = InFlightGuard { session: self, key };

        match self.fetch_and_list(username, force).await {
            Ok((outcome, records)) => {
                info!(
                    "Loaded {} records for {} (sync {})",
                    records.len(),
                    username,
                    outcome
                );
                let mut state = self.state();
                state.records = records;
                state.initialized = true;
                state.last_loaded_username = Some(username.to_string());
                LoadOutcome::Loaded(outcome)
            }
            Err(e) => {
                error!("Error loading collection for {}: {:#}", username, e);
                let message = format!("{:#}", e);
                self.state().error = Some(if message.is_empty() {
                    GENERIC_LOAD_ERROR.to_string()
                } else {
                    message
                });
                LoadOutcome::Failed
            }
        }
    }

    async fn fetch_and_list(
        &self,
        username: &str,
        force: bool,
    ) -> Result<(SyncOutcome, Vec<CatalogEntry>)> {
        let store = self.coordinator.store();
        store.ensure_ready()?;
        let outcome = self.coordinator.sync_if_stale(username, force).await?;
        let records = store.list_all_entries()?;
        Ok((outcome, records))
    }

    pub async fn refresh_collection(&self, username: &str) -> LoadOutcome {
        self.load_collection(username, true).await
    }

    pub fn clear_error(&self) {
        self.state().error = None;
    }

    pub fn records(&self) -> Vec<CatalogEntry> {
        self.state().records.clone()
    }

    /// True while at least one load is running.
    pub fn loading(&self) -> bool {
        !self.state().in_flight.is_empty()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn initialized(&self) -> bool {
        self.state().initialized
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        let state = self.state();
        CollectionSnapshot {
            records: state.records.clone(),
            loading: !state.in_flight.is_empty(),
            error: state.error.clone(),
            initialized: state.initialized,
        }
    }

    pub fn random_record(&self) -> Option<CatalogEntry> {
        pick_random(&self.state().records).cloned()
    }
}
