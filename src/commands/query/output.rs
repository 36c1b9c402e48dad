use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use super::catalog::CatalogQuery;
use super::table::{Cell, ResultTable};

#[derive(Debug, Serialize)]
struct CatalogEntry {
    number: u8,
    title: &'static str,
    requires_artifact_id: bool,
    sql: &'static str,
}

#[derive(Debug, Serialize)]
struct QueryResponse<'a> {
    number: u8,
    title: &'static str,
    artifact_id: Option<i64>,
    returned: usize,
    columns: &'a [String],
    rows: &'a [Vec<Cell>],
}

pub(crate) fn write_text_table<W: Write>(
    output: &mut W,
    heading: &str,
    table: &ResultTable,
) -> Result<()> {
    writeln!(output, "{heading}")?;
    writeln!(output, "{}", table.columns.join("\t"))?;

    for row in &table.rows {
        let rendered: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(output, "{}", rendered.join("\t"))?;
    }

    let noun = if table.rows.len() == 1 { "row" } else { "rows" };
    writeln!(output, "({} {noun})", table.rows.len())?;
    Ok(())
}

pub(super) fn write_json_response<W: Write>(
    output: &mut W,
    query: CatalogQuery,
    artifact_id: Option<i64>,
    table: &ResultTable,
) -> Result<()> {
    let response = QueryResponse {
        number: query.number(),
        title: query.title(),
        artifact_id,
        returned: table.rows.len(),
        columns: &table.columns,
        rows: &table.rows,
    };

    serde_json::to_writer_pretty(&mut *output, &response)
        .context("failed to serialize query json output")?;
    writeln!(output)?;
    Ok(())
}

pub(super) fn write_catalog_listing<W: Write>(output: &mut W, json: bool) -> Result<()> {
    if json {
        let entries: Vec<CatalogEntry> = CatalogQuery::ALL
            .into_iter()
            .map(|query| CatalogEntry {
                number: query.number(),
                title: query.title(),
                requires_artifact_id: query.requires_artifact_id(),
                sql: query.sql(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *output, &entries)
            .context("failed to serialize catalog json output")?;
        writeln!(output)?;
        return Ok(());
    }

    for query in CatalogQuery::ALL {
        if query.requires_artifact_id() {
            writeln!(output, "{}\t(requires --artifact-id)", query.label())?;
        } else {
            writeln!(output, "{}", query.label())?;
        }
    }
    Ok(())
}
