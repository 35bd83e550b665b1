use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use vinyl_cache::collection_store::{Artist, NewCatalogEntry, SqliteCollectionStore};
use vinyl_cache::local_store::LocalDatabase;
use vinyl_cache::queue_store::SqliteQueueStore;

pub fn entry(external_id: i64, title: &str) -> NewCatalogEntry {
    entry_with_artist(external_id, title, "Unknown Artist")
}

pub fn entry_with_artist(external_id: i64, title: &str, artist: &str) -> NewCatalogEntry {
    NewCatalogEntry {
        external_id,
        title: title.to_string(),
        artists: vec![Artist::new(artist)],
        year: Some(1959),
        thumbnail_url: Some(format!("https://img.discogs.com/{}-150.jpg", external_id)),
        cover_image_url: Some(format!("https://img.discogs.com/{}.jpg", external_id)),
        resource_url: format!("https://api.discogs.com/releases/{}", external_id),
        date_added: Some("2024-03-01T10:12:44-08:00".to_string()),
        genres: vec!["Jazz".to_string()],
        styles: vec!["Modal".to_string()],
    }
}

/// A store backed by a file in a temporary directory.
///
/// The directory is removed when the struct is dropped.
pub struct TestStore {
    pub db: LocalDatabase,
    pub collection: Arc<SqliteCollectionStore>,
    pub queue: Arc<SqliteQueueStore>,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("vinyl.db");
        Self::open_at(path, temp_dir)
    }

    /// Opens a store on `path`, which may already contain data. `temp_dir`
    /// must own `path`.
    pub fn open_at(path: PathBuf, temp_dir: TempDir) -> Self {
        let db = LocalDatabase::open(&path).expect("Failed to open local store");
        Self {
            collection: Arc::new(SqliteCollectionStore::new(db.clone())),
            queue: Arc::new(SqliteQueueStore::new(db.clone())),
            db,
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Like [`TestStore::new`] with the schema already in place.
    pub fn ready() -> Self {
        let store = Self::new();
        store.db.ensure_ready().expect("Failed to initialize local store");
        store
    }

    /// Opens a second, independent handle on the same file.
    pub fn reopen(&self) -> LocalDatabase {
        LocalDatabase::open(&self.path).expect("Failed to reopen local store")
    }
}
