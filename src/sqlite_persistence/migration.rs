//! Idempotent schema migration helpers.
//!
//! Every helper inspects the live schema first and only changes it when the
//! change has not been applied yet, so migrations built from them can run on
//! every startup.

use super::Table;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// A named migration step. Steps are applied in declaration order, each one
/// inside its own transaction.
pub struct Migration {
    pub name: &'static str,
    pub apply: fn(&Connection) -> Result<()>,
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Returns `(name, declared type)` for every column of `table`, in table order.
pub fn live_columns(conn: &Connection, table: &str) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

/// Brings a column rename forward: when only `old_name` exists, `new_name` is
/// added with the same declared type and the values are copied across. The old
/// column is kept. Returns true if the table was changed.
pub fn ensure_column_renamed(
    conn: &Connection,
    table: &str,
    old_name: &str,
    new_name: &str,
) -> Result<bool> {
    let columns = live_columns(conn, table)
        .with_context(|| format!("Failed to check table schema of {}", table))?;

    if columns.iter().any(|(name, _)| name == new_name) {
        debug!("Column {}.{} already present", table, new_name);
        return Ok(false);
    }
    let Some((_, old_type)) = columns.iter().find(|(name, _)| name == old_name) else {
        debug!(
            "Neither {}.{} nor {}.{} present, nothing to rename",
            table, old_name, table, new_name
        );
        return Ok(false);
    };

    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, new_name, old_type),
        [],
    )
    .with_context(|| format!("Failed to add {} column to {}", new_name, table))?;
    conn.execute(
        &format!("UPDATE {} SET {} = {}", table, new_name, old_name),
        [],
    )
    .with_context(|| format!("Failed to copy {} data into {}", old_name, new_name))?;

    info!("Migrated column {}.{} -> {}", table, old_name, new_name);
    Ok(true)
}

/// Adds `column` to `table` unless a column with that name already exists.
/// Only columns that SQLite accepts in ALTER TABLE ADD COLUMN are allowed.
pub fn ensure_column_exists(
    conn: &Connection,
    table: &str,
    column: &super::Column<'_>,
) -> Result<bool> {
    if column.is_primary_key || column.is_unique {
        bail!(
            "Column {}.{} cannot be added to an existing table",
            table,
            column.name
        );
    }
    let columns = live_columns(conn, table)
        .with_context(|| format!("Failed to check table schema of {}", table))?;
    if columns.iter().any(|(name, _)| name == column.name) {
        return Ok(false);
    }

    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {}", table, column.definition_sql()),
        [],
    )
    .with_context(|| format!("Failed to add {} column to {}", column.name, table))?;
    info!("Added column {}.{}", table, column.name);
    Ok(true)
}

/// Creates `table` (and its indices) when no table with that name exists.
pub fn ensure_table_exists(conn: &Connection, table: &Table) -> Result<bool> {
    if table_exists(conn, table.name)? {
        return Ok(false);
    }
    table
        .create(conn)
        .with_context(|| format!("Failed to create table {}", table.name))?;
    info!("Created table {}", table.name);
    Ok(true)
}

/// Applies `migrations` in order. A failing step is rolled back and aborts the
/// run before any later step executes.
pub fn run_migrations(conn: &mut Connection, migrations: &[Migration]) -> Result<()> {
    for migration in migrations {
        debug!("Running migration '{}'", migration.name);
        let tx = conn
            .transaction()
            .with_context(|| format!("Migration '{}' failed to start", migration.name))?;
        (migration.apply)(&tx).with_context(|| format!("Migration '{}' failed", migration.name))?;
        tx.commit()
            .with_context(|| format!("Migration '{}' failed to commit", migration.name))?;
    }
    Ok(())
}
