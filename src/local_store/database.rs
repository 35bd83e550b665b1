use super::migrations::MIGRATIONS;
use super::schema::{RECORDS_TABLE, SCHEMA_TABLES};
use crate::sqlite_persistence::{run_migrations, table_exists};
use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the on-device store.
///
/// All stores built on the same handle share one connection, so writes are
/// serialized and readers never observe a partially applied transaction.
#[derive(Clone)]
pub struct LocalDatabase {
    conn: Arc<Mutex<Connection>>,
    ready: Arc<AtomicBool>,
}

impl LocalDatabase {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open local store at {:?}", db_path))?;
        debug!("Opened local store at {:?}", db_path);
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            ready: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Creates missing tables, applies migrations and validates the result.
    ///
    /// Safe to call any number of times; only the first successful call does
    /// any work. A failed call leaves the handle not ready so it can be retried.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }
        let mut conn = self.lock()?;
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        info!("Initializing local store...");
        {
            let tx = conn
                .transaction()
                .context("Failed to initialize local store")?;
            for table in SCHEMA_TABLES {
                table
                    .create_if_missing(&tx)
                    .with_context(|| format!("Failed to create table {}", table.name))?;
            }
            tx.commit().context("Failed to initialize local store")?;
        }

        run_migrations(&mut conn, MIGRATIONS)?;

        for table in SCHEMA_TABLES {
            table
                .validate(&conn)
                .context("Local store schema validation failed")?;
        }

        self.ready.store(true, Ordering::Release);
        info!("Local store ready");
        Ok(())
    }

    /// True when the catalog table exists in the underlying file.
    pub fn is_ready(&self) -> Result<bool> {
        let conn = self.lock()?;
        table_exists(&conn, RECORDS_TABLE.name)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Local store connection lock poisoned"))
    }

    /// Runs `f` inside an IMMEDIATE transaction. The transaction is committed
    /// when `f` succeeds and rolled back otherwise.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock()?;
        f(&conn)
    }
}
