use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::model::{ColorRow, LoadCounts, MediaRow, MetadataRow, TransformedBatch};

/// Inserts one batch as a single transaction.
///
/// Metadata is first-write-wins on `id`; media and color rows are appended
/// every time, so loading the same batch twice duplicates them. Any failure
/// rolls back all three tables.
pub(super) fn load_batch(connection: &mut Connection, batch: &TransformedBatch) -> Result<LoadCounts> {
    let tx = connection
        .transaction()
        .context("failed to begin load transaction")?;

    let metadata_inserted = insert_metadata(&tx, &batch.metadata)?;
    let media_inserted = insert_media(&tx, &batch.media)?;
    let colors_inserted = insert_colors(&tx, &batch.colors)?;

    tx.commit().context("failed to commit load transaction")?;

    let counts = LoadCounts {
        metadata_inserted,
        metadata_skipped: batch.metadata.len() - metadata_inserted,
        media_inserted,
        colors_inserted,
    };
    debug!(?counts, "batch loaded");
    Ok(counts)
}

fn insert_metadata(connection: &Connection, rows: &[MetadataRow]) -> Result<usize> {
    let mut statement = connection
        .prepare(
            "
            INSERT OR IGNORE INTO artifact_metadata(
              id, title, culture, period, century, medium, dimensions,
              description, department, classification, accessionyear, accessionmethod
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ",
        )
        .context("failed to prepare artifact_metadata insert")?;

    let mut inserted = 0;
    for row in rows {
        inserted += statement
            .execute(params![
                row.id,
                row.title,
                row.culture,
                row.period,
                row.century,
                row.medium,
                row.dimensions,
                row.description,
                row.department,
                row.classification,
                row.accessionyear,
                row.accessionmethod,
            ])
            .with_context(|| format!("failed to insert metadata for object {}", row.id))?;
    }

    Ok(inserted)
}

fn insert_media(connection: &Connection, rows: &[MediaRow]) -> Result<usize> {
    let mut statement = connection
        .prepare(
            "
            INSERT INTO artifact_media(
              objectid, imagecount, mediacount, colorcount, rank, datebegin, dateend
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .context("failed to prepare artifact_media insert")?;

    for row in rows {
        statement
            .execute(params![
                row.objectid,
                row.imagecount,
                row.mediacount,
                row.colorcount,
                row.rank,
                row.datebegin,
                row.dateend,
            ])
            .with_context(|| format!("failed to insert media for object {}", row.objectid))?;
    }

    Ok(rows.len())
}

fn insert_colors(connection: &Connection, rows: &[ColorRow]) -> Result<usize> {
    let mut statement = connection
        .prepare(
            "
            INSERT INTO artifact_colors(objectid, color, spectrum, hue, percent, css3)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .context("failed to prepare artifact_colors insert")?;

    for row in rows {
        statement
            .execute(params![
                row.objectid,
                row.color,
                row.spectrum,
                row.hue,
                row.percent,
                row.css3,
            ])
            .with_context(|| format!("failed to insert color for object {}", row.objectid))?;
    }

    Ok(rows.len())
}
