use std::fmt;

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params, Statement};
use serde::Serialize;

use crate::commands::migrate::StoreTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Column names in statement order plus every returned row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

pub(super) fn read_table<P: Params>(
    statement: &mut Statement<'_>,
    params: P,
) -> rusqlite::Result<ResultTable> {
    let columns: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = statement.query(params)?;
    while let Some(row) = cursor.next()? {
        let mut cells = Vec::with_capacity(width);
        for index in 0..width {
            cells.push(Cell::from(row.get_ref(index)?));
        }
        rows.push(cells);
    }

    Ok(ResultTable { columns, rows })
}

/// First `limit` rows of one artifact table, in storage order.
pub(crate) fn preview_table(
    connection: &Connection,
    table: StoreTable,
    limit: usize,
) -> Result<ResultTable> {
    let sql = format!("SELECT * FROM {} LIMIT ?1", table.name());
    let mut statement = connection
        .prepare(&sql)
        .with_context(|| format!("failed to prepare preview of {}", table.name()))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    read_table(&mut statement, [limit])
        .with_context(|| format!("failed to read preview of {}", table.name()))
}
