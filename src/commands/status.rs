use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::collect::load_staged_batch;
use crate::commands::migrate::{open_store, table_counts};
use crate::model::CollectedBatch;
use crate::util::{resolve_batch_path, resolve_db_path};

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_deref());

    info!(cache_root = %args.cache_root.display(), "status requested");

    let (batch_path, staged) = staged_batch(&args)?;
    match staged {
        Some(collected) => info!(
            path = %batch_path.display(),
            classification = %collected.classification,
            collected_at = %collected.collected_at,
            has_image_filter = collected.has_image_filter,
            records = collected.record_count,
            metadata_rows = collected.batch.metadata.len(),
            media_rows = collected.batch.media.len(),
            color_rows = collected.batch.colors.len(),
            "staged batch awaiting migrate"
        ),
        None => warn!(path = %batch_path.display(), "no staged batch"),
    }

    if db_path.exists() {
        let connection = open_store(&db_path)?;
        let counts = table_counts(&connection)?;

        info!(
            path = %db_path.display(),
            artifact_metadata = counts.metadata,
            artifact_media = counts.media,
            artifact_colors = counts.colors,
            "database status"
        );
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    Ok(())
}

fn staged_batch(args: &StatusArgs) -> Result<(PathBuf, Option<CollectedBatch>)> {
    let batch_path = resolve_batch_path(&args.cache_root, args.batch_path.as_deref());
    let staged = load_staged_batch(&batch_path)?;
    Ok((batch_path, staged))
}
