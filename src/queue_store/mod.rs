mod models;
#[allow(clippy::module_inception)]
mod queue_store;
mod sqlite_queue_store;

pub use models::QueueEntry;
pub use queue_store::QueueStore;
pub use sqlite_queue_store::SqliteQueueStore;
