use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::{info, warn};

use super::*;
use crate::cli::QueryArgs;
use crate::commands::migrate::{open_store, table_counts};
use crate::util::resolve_db_path;

pub fn run(args: QueryArgs) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    let selector = match args.selector.as_deref() {
        Some(selector) if !args.list => selector,
        _ => {
            write_catalog_listing(&mut output, args.json)?;
            output.flush()?;
            return Ok(());
        }
    };

    let query = CatalogQuery::find(selector)?;
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_deref());

    let connection = open_existing_store(&db_path)?;

    info!(query = query.number(), title = query.title(), "running catalog query");
    let started = Instant::now();
    let table = execute(&connection, query, args.artifact_id)?;
    info!(
        query = query.number(),
        rows = table.rows.len(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "query completed"
    );

    if args.json {
        write_json_response(&mut output, query, args.artifact_id, &table)?;
    } else {
        write_text_table(&mut output, &query.label(), &table)?;
    }
    output.flush()?;

    Ok(())
}

/// Opens a store that `migrate` has already created. A missing file is an
/// error; a store with no rows only warns.
pub(super) fn open_existing_store(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        bail!(
            "no artifact store at {}; run `collect` and `migrate` first",
            db_path.display()
        );
    }

    let connection = open_store(db_path)?;
    if table_counts(&connection)?.is_empty() {
        warn!(
            path = %db_path.display(),
            "artifact store has no rows yet; results will be empty until a batch is migrated"
        );
    }
    Ok(connection)
}
