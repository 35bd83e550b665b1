//! Table declarations for the local collection store (vinyl.db).
//!
//! The layout is shared with stores created by earlier releases of the app,
//! so column names and nullability must not change; new requirements are
//! expressed as migrations in [`super::migrations`].

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, DEFAULT_DATETIME,
};

/// Cached remote catalog entries, keyed locally by `id` and remotely by `discogs_id`.
pub const RECORDS_TABLE: Table = Table {
    name: "records",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!("discogs_id", &SqlType::Integer, is_unique = true),
        sqlite_column!("date_added", &SqlType::Text),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artists", &SqlType::Text),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("thumb", &SqlType::Text),
        sqlite_column!("resource_url", &SqlType::Text),
        sqlite_column!("cover_image", &SqlType::Text),
        sqlite_column!("genres", &SqlType::Text),
        sqlite_column!("styles", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[],
};

/// Key/value rows. Only `lastSync` is written today.
pub const METADATA_TABLE: Table = Table {
    name: "metadata",
    columns: &[
        sqlite_column!("key", &SqlType::Text, is_primary_key = true),
        sqlite_column!("value", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const QUEUE_TABLE: Table = Table {
    name: "queue",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!(
            "record_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "records",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "date_added",
            &SqlType::Text,
            default_value = Some(DEFAULT_DATETIME)
        ),
        sqlite_column!("play_order", &SqlType::Integer),
    ],
    indices: &[
        ("idx_queue_record_id", "record_id"),
        ("idx_queue_play_order", "play_order"),
    ],
    unique_constraints: &[],
};

/// Creation order matters: `queue` references `records`.
pub const SCHEMA_TABLES: &[&Table] = &[&RECORDS_TABLE, &METADATA_TABLE, &QUEUE_TABLE];

pub const LAST_SYNC_KEY: &str = "lastSync";
