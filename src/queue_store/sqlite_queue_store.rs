use super::models::QueueEntry;
use super::queue_store::QueueStore;
use crate::collection_store::{CatalogEntry, SqliteCollectionStore};
use crate::local_store::LocalDatabase;
use anyhow::{Context, Result};
use rusqlite::params;
use tracing::{debug, info};

pub struct SqliteQueueStore {
    db: LocalDatabase,
}

impl SqliteQueueStore {
    pub fn new(db: LocalDatabase) -> Self {
        Self { db }
    }

    fn row_to_queue_entry(row: &rusqlite::Row) -> rusqlite::Result<QueueEntry> {
        Ok(QueueEntry {
            id: row.get("queue_id")?,
            record_id: row.get("record_id")?,
            date_added: row.get("queue_date_added")?,
            play_order: row.get("play_order")?,
            record: SqliteCollectionStore::row_to_entry(row)?,
        })
    }
}

impl QueueStore for SqliteQueueStore {
    fn add_to_queue(&self, entry: &CatalogEntry) -> Result<i64> {
        let (queue_id, play_order) = self
            .db
            .write(|tx| {
                let play_order: i64 = tx.query_row(
                    "SELECT COALESCE(MAX(play_order), 0) + 1 FROM queue",
                    [],
                    |row| row.get(0),
                )?;
                tx.execute(
                    "INSERT INTO queue (record_id, play_order) VALUES (?1, ?2)",
                    params![entry.id, play_order],
                )?;
                Ok((tx.last_insert_rowid(), play_order))
            })
            .context("Failed to add record to queue")?;
        info!(
            "Queued '{}' (record {}) at position {}",
            entry.title, entry.id, play_order
        );
        Ok(queue_id)
    }

    fn list_queue(&self) -> Result<Vec<QueueEntry>> {
        self.db
            .read(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT
                        q.id AS queue_id, q.record_id AS record_id,
                        q.date_added AS queue_date_added, q.play_order AS play_order,
                        r.id AS id, r.discogs_id AS discogs_id, r.date_added AS date_added,
                        r.title AS title, r.artists AS artists, r.year AS year,
                        r.thumb AS thumb, r.resource_url AS resource_url,
                        r.cover_image AS cover_image, r.genres AS genres, r.styles AS styles
                    FROM queue q
                    INNER JOIN records r ON r.id = q.record_id
                    ORDER BY q.play_order ASC, q.id ASC"#,
                )?;
                let entries = stmt
                    .query_map([], Self::row_to_queue_entry)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(entries)
            })
            .context("Failed to load queue")
    }

    fn remove_from_queue(&self, queue_id: i64) -> Result<usize> {
        let removed = self
            .db
            .write(|tx| Ok(tx.execute("DELETE FROM queue WHERE id = ?1", params![queue_id])?))
            .context("Failed to remove record from queue")?;
        debug!("Removed {} queue row(s) for id {}", removed, queue_id);
        Ok(removed)
    }

    fn clear_queue(&self) -> Result<usize> {
        let removed = self
            .db
            .write(|tx| Ok(tx.execute("DELETE FROM queue", [])?))
            .context("Failed to clear queue")?;
        info!("Cleared {} queue entries", removed);
        Ok(removed)
    }

    fn is_in_queue(&self, record_id: i64) -> Result<bool> {
        self.db
            .read(|conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM queue WHERE record_id = ?1)",
                    params![record_id],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .context("Failed to check queue status")
    }

    fn get_queue_count(&self) -> Result<usize> {
        self.db
            .read(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM queue", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .context("Failed to get queue count")
    }
}
