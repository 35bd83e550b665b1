mod migration;
mod table;

pub use migration::{
    ensure_column_exists, ensure_column_renamed, ensure_table_exists, live_columns,
    run_migrations, table_exists, Migration,
};
pub use table::{Column, ForeignKey, ForeignKeyOnChange, SqlType, Table};

pub const DEFAULT_DATETIME: &str = "(datetime('now'))";
