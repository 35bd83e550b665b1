use crate::collection_store::CatalogEntry;
use serde::{Deserialize, Serialize};

/// A pending-listen entry joined with the catalog entry it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub record_id: i64,
    pub date_added: Option<String>,
    /// Strictly increasing in insertion order; gaps left by removals are kept.
    pub play_order: Option<i64>,
    pub record: CatalogEntry,
}
