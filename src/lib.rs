//! Vinyl Cache Library
//!
//! Local cache of a Discogs collection: SQLite storage with startup
//! migrations, staleness-driven sync, a listening queue and the shared
//! session state built on top of them.

pub mod collection_store;
pub mod config;
pub mod local_store;
pub mod queue_store;
pub mod remote;
pub mod session;
pub mod sqlite_persistence;
pub mod sync;

// Re-export commonly used types for convenience
pub use collection_store::{CatalogEntry, CollectionStore, NewCatalogEntry, SqliteCollectionStore};
pub use local_store::LocalDatabase;
pub use queue_store::{QueueEntry, QueueStore, SqliteQueueStore};
pub use remote::{CollectionFetcher, DiscogsClient, FetchError};
pub use session::{CollectionSession, LoadOutcome, QueueSession};
pub use sync::{SyncCoordinator, SyncOutcome};
