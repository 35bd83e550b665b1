//! Ordered startup migrations for the local collection store.
//!
//! Steps run on every startup after the tables in [`SCHEMA_TABLES`] have been
//! created if missing. Each step is idempotent and runs in its own transaction;
//! the first failure aborts the sequence.
//!
//! 1. `records.thumbnail` renamed to `records.thumb`
//! 2. optional descriptive columns added to `records`
//! 3. `queue` table created
//!
//! [`SCHEMA_TABLES`]: super::schema::SCHEMA_TABLES

use super::schema::{QUEUE_TABLE, RECORDS_TABLE};
use crate::sqlite_persistence::{
    ensure_column_exists, ensure_column_renamed, ensure_table_exists, Migration,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

const OPTIONAL_RECORD_COLUMNS: &[&str] = &["cover_image", "genres", "styles"];

fn rename_thumbnail_to_thumb(conn: &Connection) -> Result<()> {
    ensure_column_renamed(conn, RECORDS_TABLE.name, "thumbnail", "thumb")?;
    Ok(())
}

fn add_optional_record_columns(conn: &Connection) -> Result<()> {
    for name in OPTIONAL_RECORD_COLUMNS {
        let column = RECORDS_TABLE
            .columns
            .iter()
            .find(|c| c.name == *name)
            .with_context(|| format!("Column {} is not declared on records", name))?;
        ensure_column_exists(conn, RECORDS_TABLE.name, column)?;
    }
    Ok(())
}

fn create_queue_table(conn: &Connection) -> Result<()> {
    ensure_table_exists(conn, &QUEUE_TABLE)?;
    Ok(())
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "records_thumbnail_to_thumb",
        apply: rename_thumbnail_to_thumb,
    },
    Migration {
        name: "records_optional_columns",
        apply: add_optional_record_columns,
    },
    Migration {
        name: "queue_table",
        apply: create_queue_table,
    },
];
