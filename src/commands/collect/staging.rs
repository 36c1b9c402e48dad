use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::CollectedBatch;
use crate::util::{read_json, write_json_pretty};

pub(super) const BATCH_MANIFEST_VERSION: u32 = 1;

/// Replaces any previously staged batch.
pub(super) fn stage_batch(path: &Path, collected: &CollectedBatch) -> Result<()> {
    write_json_pretty(path, collected)?;
    info!(
        path = %path.display(),
        classification = %collected.classification,
        records = collected.record_count,
        "staged collected batch"
    );
    Ok(())
}

pub(crate) fn load_staged_batch(path: &Path) -> Result<Option<CollectedBatch>> {
    if !path.exists() {
        return Ok(None);
    }

    read_json(path).map(Some)
}

pub(crate) fn discard_staged_batch(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    fs::remove_file(path)
        .with_context(|| format!("failed to discard staged batch {}", path.display()))?;
    info!(path = %path.display(), "discarded staged batch");
    Ok(())
}
