use std::io::Write;

use anyhow::Result;

use crate::model::{CollectedBatch, RawRecord};

pub(super) fn write_collect_summary<W: Write>(
    output: &mut W,
    collected: &CollectedBatch,
    records: &[RawRecord],
    preview: usize,
) -> Result<()> {
    writeln!(
        output,
        "Fetched {} records for classification \"{}\"",
        collected.record_count, collected.classification
    )?;
    writeln!(
        output,
        "Staged rows: metadata={} media={} colors={}",
        collected.batch.metadata.len(),
        collected.batch.media.len(),
        collected.batch.colors.len()
    )?;

    if records.is_empty() || preview == 0 {
        return Ok(());
    }

    writeln!(output, "Sample data:")?;
    writeln!(output, "id\ttitle\tculture\tcentury\tclassification")?;
    for record in records.iter().take(preview) {
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}",
            record.integer("id").map(|id| id.to_string()).unwrap_or_default(),
            record.text("title").unwrap_or_default(),
            record.text("culture").unwrap_or_default(),
            record.text("century").unwrap_or_default(),
            record.text("classification").unwrap_or_default(),
        )?;
    }

    Ok(())
}
