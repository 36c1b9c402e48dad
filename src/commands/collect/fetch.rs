use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::model::RawRecord;

#[derive(Debug, Clone)]
pub(super) struct FetchRequest {
    pub classification: String,
    pub max_records: usize,
    pub page_size: usize,
    pub has_image: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListingPage {
    #[serde(default)]
    pub records: Option<Vec<RawRecord>>,
    #[serde(default)]
    pub info: Option<ListingInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListingInfo {
    pub totalrecords: Option<u64>,
    pub pages: Option<u64>,
}

/// One page of the remote object listing.
pub(super) trait ListingSource {
    fn fetch_page(&self, request: &FetchRequest, page: usize) -> Result<ListingPage>;
}

pub(super) struct HttpListingSource {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpListingSource {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl ListingSource for HttpListingSource {
    fn fetch_page(&self, request: &FetchRequest, page: usize) -> Result<ListingPage> {
        let query = listing_query(&self.api_key, request, page);

        let response = self
            .client
            .get(self.endpoint.as_str())
            .query(&query)
            .send()
            .with_context(|| format!("request for page {page} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("listing endpoint returned {status} for page {page}");
        }

        response
            .json::<ListingPage>()
            .with_context(|| format!("failed to decode listing page {page}"))
    }
}

pub(super) fn listing_query(
    api_key: &str,
    request: &FetchRequest,
    page: usize,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("apikey", api_key.to_string()),
        ("classification", request.classification.clone()),
        ("page", page.to_string()),
        ("size", request.page_size.to_string()),
    ];
    if request.has_image {
        query.push(("hasimage", "1".to_string()));
    }
    query
}

/// Walks the listing from page 1 until the cap, an empty page, or the first
/// failed request. A failure keeps whatever was collected before it.
pub(super) fn fetch_by_classification<S: ListingSource + ?Sized>(
    source: &S,
    request: &FetchRequest,
) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut page = 1;

    while records.len() < request.max_records {
        let listing = match source.fetch_page(request, page) {
            Ok(listing) => listing,
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(
                    page,
                    collected = records.len(),
                    reason = %reason,
                    "listing request failed; keeping records collected so far"
                );
                break;
            }
        };

        if page == 1 {
            if let Some(info) = &listing.info {
                info!(
                    classification = %request.classification,
                    total_records = info.totalrecords.unwrap_or_default(),
                    pages = info.pages.unwrap_or_default(),
                    "listing reports upstream totals"
                );
            }
        }

        let page_records = listing.records.unwrap_or_default();
        if page_records.is_empty() {
            debug!(page, "listing exhausted");
            break;
        }

        debug!(page, returned = page_records.len(), "fetched listing page");
        records.extend(page_records);
        page += 1;
    }

    records.truncate(request.max_records);
    records
}
