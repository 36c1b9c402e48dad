use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use super::*;
use crate::cli::CollectArgs;
use crate::model::{CollectedBatch, RawRecord};
use crate::util::{now_utc_string, resolve_batch_path};

pub fn run(args: CollectArgs) -> Result<()> {
    let request = fetch_request(&args)?;
    let batch_path = resolve_batch_path(&args.cache_root, args.batch_path.as_deref());

    info!(
        classification = %request.classification,
        max_records = request.max_records,
        page_size = request.page_size,
        has_image = request.has_image,
        endpoint = %args.endpoint,
        "starting collect"
    );

    let (collected, records) = collect_batch(&batch_path, &request, || {
        HttpListingSource::new(&args.endpoint, &args.api_key)
    })?;

    info!(
        records = collected.record_count,
        metadata_rows = collected.batch.metadata.len(),
        media_rows = collected.batch.media.len(),
        color_rows = collected.batch.colors.len(),
        "collect completed"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_collect_summary(&mut output, &collected, &records, args.preview)?;
    output.flush()?;

    Ok(())
}

/// Checks the arguments before any request is made.
pub(super) fn fetch_request(args: &CollectArgs) -> Result<FetchRequest> {
    let classification = args.classification.trim();
    if classification.is_empty() {
        bail!("classification must not be blank (for example Coins, Paintings, Jewelry)");
    }
    if args.page_size == 0 {
        bail!("--page-size must be at least 1");
    }

    Ok(FetchRequest {
        classification: classification.to_string(),
        max_records: args.max_records,
        page_size: args.page_size,
        has_image: args.has_image,
    })
}

/// Fetches, transforms and stages one classification.
///
/// The previously staged batch is discarded before the source is opened, so
/// a collect that fails at any later step leaves nothing for `migrate`.
pub(super) fn collect_batch<S, F>(
    batch_path: &Path,
    request: &FetchRequest,
    connect: F,
) -> Result<(CollectedBatch, Vec<RawRecord>)>
where
    S: ListingSource,
    F: FnOnce() -> Result<S>,
{
    discard_staged_batch(batch_path)?;
    let source = connect()?;

    let records = fetch_by_classification(&source, request);
    if records.is_empty() {
        warn!(
            classification = %request.classification,
            "no records returned for classification"
        );
    }

    let batch = transform(&records).context("failed to transform fetched records")?;

    let collected = CollectedBatch {
        manifest_version: BATCH_MANIFEST_VERSION,
        classification: request.classification.clone(),
        collected_at: now_utc_string(),
        has_image_filter: request.has_image,
        record_count: records.len(),
        batch,
    };
    stage_batch(batch_path, &collected)?;

    Ok((collected, records))
}
