use super::models::{CatalogEntry, NewCatalogEntry};
use anyhow::Result;

/// Local cache of the remote catalog plus the sync watermark.
///
/// Implementations never retry and never swallow storage failures.
pub trait CollectionStore: Send + Sync {
    /// Creates and migrates the underlying schema. Idempotent.
    fn ensure_ready(&self) -> Result<()>;

    // === Entries ===

    /// Inserts every entry, or updates all descriptive fields in place when
    /// an entry with the same `external_id` already exists. All entries are
    /// applied atomically. Returns the number of entries written.
    fn upsert_entries(&self, entries: &[NewCatalogEntry]) -> Result<usize>;

    /// Every cached entry, ordered by title.
    fn list_all_entries(&self) -> Result<Vec<CatalogEntry>>;

    fn count_entries(&self) -> Result<usize>;

    fn get_entry_by_external_id(&self, external_id: i64) -> Result<Option<CatalogEntry>>;

    // === Watermark ===

    /// Epoch milliseconds of the start of the last successful sync, or `None`
    /// if there never was one or the stored value is unreadable.
    fn get_last_sync_timestamp(&self) -> Result<Option<i64>>;

    /// Negative timestamps are logged and ignored.
    fn set_last_sync_timestamp(&self, timestamp_ms: i64) -> Result<()>;

    /// Removes all entries, their queue rows and the watermark.
    fn reset(&self) -> Result<()>;
}
