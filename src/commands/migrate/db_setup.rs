use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::model::TableCounts;
use crate::util::ensure_directory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreTable {
    Metadata,
    Media,
    Colors,
}

impl StoreTable {
    pub const ALL: [StoreTable; 3] = [Self::Metadata, Self::Media, Self::Colors];

    pub fn name(self) -> &'static str {
        match self {
            Self::Metadata => "artifact_metadata",
            Self::Media => "artifact_media",
            Self::Colors => "artifact_colors",
        }
    }
}

/// Opens the store file, creating it and its tables when absent.
pub(crate) fn open_store(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }

    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub(crate) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS artifact_metadata (
              id INTEGER PRIMARY KEY,
              title TEXT,
              culture TEXT,
              period TEXT,
              century TEXT,
              medium TEXT,
              dimensions TEXT,
              description TEXT,
              department TEXT,
              classification TEXT,
              accessionyear INTEGER,
              accessionmethod TEXT
            );

            CREATE TABLE IF NOT EXISTS artifact_media (
              objectid INTEGER,
              imagecount INTEGER,
              mediacount INTEGER,
              colorcount INTEGER,
              rank INTEGER,
              datebegin INTEGER,
              dateend INTEGER
            );

            CREATE TABLE IF NOT EXISTS artifact_colors (
              objectid INTEGER,
              color TEXT,
              spectrum TEXT,
              hue TEXT,
              percent REAL,
              css3 TEXT
            );
            ",
        )
        .context("failed to ensure artifact tables")
}

pub(crate) fn table_counts(connection: &Connection) -> Result<TableCounts> {
    Ok(TableCounts {
        metadata: count_rows(connection, StoreTable::Metadata)?,
        media: count_rows(connection, StoreTable::Media)?,
        colors: count_rows(connection, StoreTable::Colors)?,
    })
}

fn count_rows(connection: &Connection, table: StoreTable) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    connection
        .query_row(&sql, [], |row| row.get(0))
        .with_context(|| format!("failed to count rows in {}", table.name()))
}
