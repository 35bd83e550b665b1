#[allow(clippy::module_inception)]
mod collection_store;
mod models;
mod sqlite_collection_store;

pub use collection_store::CollectionStore;
pub use models::{Artist, CatalogEntry, NewCatalogEntry};
pub use sqlite_collection_store::SqliteCollectionStore;
