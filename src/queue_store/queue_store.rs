use super::models::QueueEntry;
use crate::collection_store::CatalogEntry;
use anyhow::Result;

/// Ordered list of catalog entries the user wants to listen to next.
///
/// Every operation runs in its own transaction and fails with an error naming
/// the operation. Duplicate prevention is left to the caller.
pub trait QueueStore: Send + Sync {
    /// Appends `entry` after the current last position. Returns the new queue id.
    fn add_to_queue(&self, entry: &CatalogEntry) -> Result<i64>;

    /// Queue entries in ascending play order.
    fn list_queue(&self) -> Result<Vec<QueueEntry>>;

    /// Returns the number of removed rows, 0 for an unknown id.
    fn remove_from_queue(&self, queue_id: i64) -> Result<usize>;

    /// Returns the number of removed rows.
    fn clear_queue(&self) -> Result<usize>;

    fn is_in_queue(&self, record_id: i64) -> Result<bool>;

    fn get_queue_count(&self) -> Result<usize>;
}
