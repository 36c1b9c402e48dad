use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{info, warn};

use super::*;
use crate::cli::MigrateArgs;
use crate::commands::collect::{discard_staged_batch, load_staged_batch};
use crate::commands::query::{preview_table, write_text_table};
use crate::model::{CollectedBatch, LoadCounts, MigratePaths, MigrateRunManifest, TableCounts};
use crate::util::{
    manifest_dir, now_utc_string, resolve_batch_path, resolve_db_path, utc_compact_string,
    write_json_pretty,
};

pub fn run(args: MigrateArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let cache_root = args.cache_root.clone();
    let batch_path = resolve_batch_path(&cache_root, args.batch_path.as_deref());
    let db_path = resolve_db_path(&cache_root, args.db_path.as_deref());
    let run_manifest_path = args.run_manifest_path.clone().unwrap_or_else(|| {
        manifest_dir(&cache_root).join(format!(
            "migrate_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    info!(cache_root = %cache_root.display(), run_id = %run_id, "starting migrate");

    let Some(outcome) = migrate_batch(&batch_path, &db_path)? else {
        return Ok(());
    };
    let MigrateOutcome {
        collected,
        inserted,
        totals,
        connection,
    } = outcome;

    let manifest = MigrateRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        classification: collected.classification.clone(),
        collected_at: collected.collected_at.clone(),
        record_count: collected.record_count,
        paths: MigratePaths {
            cache_root: cache_root.display().to_string(),
            batch_path: batch_path.display().to_string(),
            db_path: db_path.display().to_string(),
        },
        inserted,
        totals,
    };
    write_json_pretty(&run_manifest_path, &manifest)?;
    info!(path = %run_manifest_path.display(), "wrote migrate run manifest");

    info!(
        metadata_inserted = inserted.metadata_inserted,
        metadata_skipped = inserted.metadata_skipped,
        media_inserted = inserted.media_inserted,
        colors_inserted = inserted.colors_inserted,
        "migrate completed"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_migrate_summary(&mut output, &inserted, &totals)?;
    if args.preview > 0 {
        for table in StoreTable::ALL {
            let preview = preview_table(&connection, table, args.preview)?;
            writeln!(output)?;
            write_text_table(&mut output, table.name(), &preview)?;
        }
    }
    output.flush()?;

    Ok(())
}

pub(super) struct MigrateOutcome {
    pub collected: CollectedBatch,
    pub inserted: LoadCounts,
    pub totals: TableCounts,
    pub connection: Connection,
}

/// Loads the staged batch into the store and discards it once committed.
///
/// A missing batch is an error. An empty batch is discarded without opening
/// the store and yields `None`. A failed load keeps the batch for a retry.
pub(super) fn migrate_batch(batch_path: &Path, db_path: &Path) -> Result<Option<MigrateOutcome>> {
    let Some(collected) = load_staged_batch(batch_path)? else {
        bail!(
            "no collected batch at {}; run `collect` first",
            batch_path.display()
        );
    };

    info!(
        classification = %collected.classification,
        collected_at = %collected.collected_at,
        records = collected.record_count,
        "loaded staged batch"
    );

    if collected.batch.is_empty() {
        warn!(
            classification = %collected.classification,
            "staged batch has no records; nothing to migrate"
        );
        discard_staged_batch(batch_path)?;
        return Ok(None);
    }

    let mut connection = open_store(db_path)?;
    let inserted = load_batch(&mut connection, &collected.batch).with_context(|| {
        format!(
            "failed to migrate {}; store left unchanged and batch kept",
            batch_path.display()
        )
    })?;
    discard_staged_batch(batch_path)?;
    let totals = table_counts(&connection)?;

    Ok(Some(MigrateOutcome {
        collected,
        inserted,
        totals,
        connection,
    }))
}

pub(super) fn write_migrate_summary<W: Write>(
    output: &mut W,
    inserted: &LoadCounts,
    totals: &TableCounts,
) -> Result<()> {
    writeln!(output, "Data inserted into SQL")?;
    writeln!(
        output,
        "artifact_metadata: inserted={} skipped_existing={} total={}",
        inserted.metadata_inserted, inserted.metadata_skipped, totals.metadata
    )?;
    writeln!(
        output,
        "artifact_media: inserted={} total={}",
        inserted.media_inserted, totals.media
    )?;
    writeln!(
        output,
        "artifact_colors: inserted={} total={}",
        inserted.colors_inserted, totals.colors
    )?;
    Ok(())
}
