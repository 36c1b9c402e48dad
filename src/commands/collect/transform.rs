use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{ColorRow, MediaRow, MetadataRow, RawRecord, TransformedBatch};

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum TransformError {
    #[error("record {index} has no integer object id")]
    MissingObjectId { index: usize },
}

/// Splits raw listing records into the three table row sets.
///
/// Missing keys, explicit nulls and values of the wrong JSON type all project
/// to `None`. Only `id` is required; one record without it fails the batch.
pub(super) fn transform(records: &[RawRecord]) -> Result<TransformedBatch, TransformError> {
    let mut batch = TransformedBatch::default();

    for (index, record) in records.iter().enumerate() {
        let id = record
            .integer("id")
            .ok_or(TransformError::MissingObjectId { index })?;

        batch.metadata.push(metadata_row(id, record));
        batch.media.push(media_row(id, record));
        batch.colors.extend(color_rows(id, record));
    }

    Ok(batch)
}

fn metadata_row(id: i64, record: &RawRecord) -> MetadataRow {
    MetadataRow {
        id,
        title: record.text("title"),
        culture: record.text("culture"),
        period: record.text("period"),
        century: record.text("century"),
        medium: record.text("medium"),
        dimensions: record.text("dimensions"),
        description: record.text("description"),
        department: record.text("department"),
        classification: record.text("classification"),
        accessionyear: record.integer("accessionyear"),
        accessionmethod: record.text("accessionmethod"),
    }
}

fn media_row(id: i64, record: &RawRecord) -> MediaRow {
    MediaRow {
        objectid: id,
        imagecount: record.integer("imagecount"),
        mediacount: record.integer("mediacount"),
        colorcount: record.integer("colorcount"),
        rank: record.integer("rank"),
        datebegin: record.integer("datebegin"),
        dateend: record.integer("dateend"),
    }
}

// Non-object swatches are skipped.
fn color_rows(id: i64, record: &RawRecord) -> impl Iterator<Item = ColorRow> + '_ {
    record
        .list("colors")
        .iter()
        .filter_map(Value::as_object)
        .map(move |swatch| ColorRow {
            objectid: id,
            color: swatch_text(swatch, "color"),
            spectrum: swatch_text(swatch, "spectrum"),
            hue: swatch_text(swatch, "hue"),
            percent: swatch.get("percent").and_then(Value::as_f64),
            css3: swatch_text(swatch, "css3"),
        })
}

fn swatch_text(swatch: &Map<String, Value>, key: &str) -> Option<String> {
    swatch.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}
