use super::collection_store::CollectionStore;
use super::models::*;
use crate::local_store::{LocalDatabase, LAST_SYNC_KEY};
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info, warn};

const SELECT_ENTRY_COLUMNS: &str = "SELECT id, discogs_id, date_added, title, artists, year, \
     thumb, resource_url, cover_image, genres, styles FROM records";

pub struct SqliteCollectionStore {
    db: LocalDatabase,
}

impl SqliteCollectionStore {
    pub fn new(db: LocalDatabase) -> Self {
        Self { db }
    }

    pub(crate) fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<CatalogEntry> {
        Ok(CatalogEntry {
            id: row.get("id")?,
            external_id: row.get("discogs_id")?,
            title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
            artists: decode_artists(row.get("artists")?),
            year: normalize_year(row.get("year")?),
            thumbnail_url: row.get("thumb")?,
            cover_image_url: row.get("cover_image")?,
            resource_url: row
                .get::<_, Option<String>>("resource_url")?
                .unwrap_or_default(),
            date_added: row.get("date_added")?,
            genres: decode_tags(row.get("genres")?),
            styles: decode_tags(row.get("styles")?),
        })
    }

    fn parse_watermark(value: Value) -> Option<i64> {
        let parsed = match &value {
            Value::Integer(i) => Some(*i),
            Value::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed {
            Some(ts) if ts >= 0 => Some(ts),
            _ => {
                warn!("Ignoring malformed {} value {:?}", LAST_SYNC_KEY, value);
                None
            }
        }
    }
}

impl CollectionStore for SqliteCollectionStore {
    fn ensure_ready(&self) -> Result<()> {
        self.db.ensure_ready()
    }

    fn upsert_entries(&self, entries: &[NewCatalogEntry]) -> Result<usize> {
        if entries.is_empty() {
            debug!("No collection entries to upsert");
            return Ok(0);
        }

        let written = self
            .db
            .write(|tx| {
                let mut stmt = tx.prepare_cached(
                    r#"INSERT INTO records (
                        discogs_id, date_added, title, artists, year,
                        thumb, resource_url, cover_image, genres, styles
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    ON CONFLICT(discogs_id) DO UPDATE SET
                        date_added = excluded.date_added,
                        title = excluded.title,
                        artists = excluded.artists,
                        year = excluded.year,
                        thumb = excluded.thumb,
                        resource_url = excluded.resource_url,
                        cover_image = excluded.cover_image,
                        genres = excluded.genres,
                        styles = excluded.styles"#,
                )?;
                for entry in entries {
                    stmt.execute(params![
                        entry.external_id,
                        entry.date_added,
                        entry.title,
                        encode_artists(&entry.artists)?,
                        normalize_year(entry.year),
                        entry.thumbnail_url,
                        entry.resource_url,
                        entry.cover_image_url,
                        encode_tags(&entry.genres)?,
                        encode_tags(&entry.styles)?,
                    ])
                    .with_context(|| format!("Failed to write entry {}", entry.external_id))?;
                }
                Ok(entries.len())
            })
            .context("Failed to upsert collection entries")?;
        info!("Upserted {} collection entries", written);
        Ok(written)
    }

    fn list_all_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.db
            .read(|conn| {
                // Rows without a natural key predate the upsert path and cannot be addressed
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE discogs_id IS NOT NULL ORDER BY title ASC, id ASC",
                    SELECT_ENTRY_COLUMNS
                ))?;
                let entries = stmt
                    .query_map([], Self::row_to_entry)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(entries)
            })
            .context("Failed to list collection entries")
    }

    fn count_entries(&self) -> Result<usize> {
        self.db
            .read(|conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM records WHERE discogs_id IS NOT NULL",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count as usize)
            })
            .context("Failed to count collection entries")
    }

    fn get_entry_by_external_id(&self, external_id: i64) -> Result<Option<CatalogEntry>> {
        self.db
            .read(|conn| {
                let mut stmt =
                    conn.prepare(&format!("{} WHERE discogs_id = ?1", SELECT_ENTRY_COLUMNS))?;
                let entry = stmt
                    .query_row(params![external_id], Self::row_to_entry)
                    .optional()?;
                Ok(entry)
            })
            .with_context(|| format!("Failed to get collection entry {}", external_id))
    }

    fn get_last_sync_timestamp(&self) -> Result<Option<i64>> {
        let value = self
            .db
            .read(|conn| {
                let value: Option<Value> = conn
                    .query_row(
                        "SELECT value FROM metadata WHERE key = ?1",
                        params![LAST_SYNC_KEY],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .context("Failed to read last sync time")?;

        Ok(match value {
            None | Some(Value::Null) => None,
            Some(value) => Self::parse_watermark(value),
        })
    }

    fn set_last_sync_timestamp(&self, timestamp_ms: i64) -> Result<()> {
        if timestamp_ms < 0 {
            warn!("Refusing to store negative sync timestamp {}", timestamp_ms);
            return Ok(());
        }
        self.db
            .write(|tx| {
                tx.execute(
                    "INSERT INTO metadata (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![LAST_SYNC_KEY, timestamp_ms.to_string()],
                )?;
                Ok(())
            })
            .context("Failed to update last sync time")?;
        debug!("Last sync time set to {}", timestamp_ms);
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.db
            .write(|tx| {
                tx.execute("DELETE FROM records", [])?;
                tx.execute("DELETE FROM metadata", [])?;
                Ok(())
            })
            .context("Failed to reset local store")?;
        info!("Local store reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_store() -> SqliteCollectionStore {
        let db = LocalDatabase::open_in_memory().unwrap();
        let store = SqliteCollectionStore::new(db);
        store.ensure_ready().unwrap();
        store
    }

    fn new_entry(external_id: i64, title: &str) -> NewCatalogEntry {
        NewCatalogEntry {
            external_id,
            title: title.to_string(),
            artists: vec![Artist::new("Some Artist")],
            year: Some(1970),
            thumbnail_url: Some(format!("https://img/{}.jpg", external_id)),
            cover_image_url: None,
            resource_url: format!("https://api/releases/{}", external_id),
            date_added: Some("2024-01-01T00:00:00-08:00".to_string()),
            genres: vec!["Jazz".to_string()],
            styles: vec![],
        }
    }

    #[test]
    fn test_upsert_and_list() {
        let store = ready_store();
        let written = store
            .upsert_entries(&[new_entry(2, "Bitches Brew"), new_entry(1, "A Love Supreme")])
            .unwrap();
        assert_eq!(written, 2);

        let entries = store.list_all_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "A Love Supreme");
        assert_eq!(entries[0].external_id, 1);
        assert_eq!(entries[0].genres, vec!["Jazz".to_string()]);
        assert!(entries[0].styles.is_empty());
        assert_eq!(entries[1].title, "Bitches Brew");
    }

    #[test]
    fn test_upsert_twice_does_not_duplicate() {
        let store = ready_store();
        let batch = vec![new_entry(1, "A"), new_entry(2, "B")];
        store.upsert_entries(&batch).unwrap();
        let first = store.list_all_entries().unwrap();

        store.upsert_entries(&batch).unwrap();
        let second = store.list_all_entries().unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count_entries().unwrap(), 2);
    }

    #[test]
    fn test_upsert_updates_in_place_and_keeps_id() {
        let store = ready_store();
        store.upsert_entries(&[new_entry(5, "Old title")]).unwrap();
        let before = store.get_entry_by_external_id(5).unwrap().unwrap();

        let mut updated = new_entry(5, "New title");
        updated.year = Some(0);
        updated.thumbnail_url = None;
        updated.styles = vec!["Hard Bop".to_string()];
        store.upsert_entries(&[updated]).unwrap();

        let after = store.get_entry_by_external_id(5).unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.title, "New title");
        assert_eq!(after.year, None);
        assert_eq!(after.thumbnail_url, None);
        assert_eq!(after.styles, vec!["Hard Bop".to_string()]);
    }

    #[test]
    fn test_upsert_empty_is_noop() {
        let store = ready_store();
        assert_eq!(store.upsert_entries(&[]).unwrap(), 0);
        assert!(store.list_all_entries().unwrap().is_empty());
    }

    #[test]
    fn test_get_missing_entry() {
        let store = ready_store();
        assert!(store.get_entry_by_external_id(404).unwrap().is_none());
    }

    #[test]
    fn test_watermark_roundtrip_and_overwrite() {
        let store = ready_store();
        assert_eq!(store.get_last_sync_timestamp().unwrap(), None);

        store.set_last_sync_timestamp(1_000).unwrap();
        store.set_last_sync_timestamp(2_000).unwrap();
        assert_eq!(store.get_last_sync_timestamp().unwrap(), Some(2_000));
    }

    #[test]
    fn test_negative_watermark_is_ignored() {
        let store = ready_store();
        store.set_last_sync_timestamp(5_000).unwrap();
        store.set_last_sync_timestamp(-1).unwrap();
        assert_eq!(store.get_last_sync_timestamp().unwrap(), Some(5_000));
    }

    #[test]
    fn test_malformed_watermark_reads_as_none() {
        let store = ready_store();
        for raw in ["not-a-number", "-20", ""] {
            store
                .db
                .write(|tx| {
                    tx.execute(
                        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('lastSync', ?1)",
                        params![raw],
                    )?;
                    Ok(())
                })
                .unwrap();
            assert_eq!(store.get_last_sync_timestamp().unwrap(), None, "value {:?}", raw);
        }
    }

    #[test]
    fn test_integer_watermark_is_accepted() {
        let store = ready_store();
        store
            .db
            .write(|tx| {
                tx.execute(
                    "INSERT INTO metadata (key, value) VALUES ('lastSync', 1234)",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get_last_sync_timestamp().unwrap(), Some(1234));
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = ready_store();
        store.upsert_entries(&[new_entry(1, "A")]).unwrap();
        store.set_last_sync_timestamp(10).unwrap();

        store.reset().unwrap();
        assert_eq!(store.count_entries().unwrap(), 0);
        assert_eq!(store.get_last_sync_timestamp().unwrap(), None);
    }

    #[test]
    fn test_failed_upsert_is_atomic() {
        let store = ready_store();
        store
            .db
            .write(|tx| {
                // Reject one specific title so the batch fails half way through
                tx.execute_batch(
                    "CREATE TRIGGER reject_bad BEFORE INSERT ON records
                     WHEN NEW.title = 'bad'
                     BEGIN SELECT RAISE(ABORT, 'bad title'); END;",
                )?;
                Ok(())
            })
            .unwrap();

        let err = store
            .upsert_entries(&[new_entry(1, "good"), new_entry(2, "bad")])
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to upsert collection entries"));
        assert!(message.contains("bad title"));
        assert_eq!(store.count_entries().unwrap(), 0);
    }
}
