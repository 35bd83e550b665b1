mod database;
mod migrations;
mod schema;

pub use database::LocalDatabase;
pub use migrations::MIGRATIONS;
pub use schema::{LAST_SYNC_KEY, METADATA_TABLE, QUEUE_TABLE, RECORDS_TABLE, SCHEMA_TABLES};
