use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One object exactly as the listing endpoint returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
    }

    pub fn list(&self, key: &str) -> &[Value] {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub id: i64,
    pub title: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub century: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub accessionyear: Option<i64>,
    pub accessionmethod: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRow {
    pub objectid: i64,
    pub imagecount: Option<i64>,
    pub mediacount: Option<i64>,
    pub colorcount: Option<i64>,
    pub rank: Option<i64>,
    pub datebegin: Option<i64>,
    pub dateend: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRow {
    pub objectid: i64,
    pub color: Option<String>,
    pub spectrum: Option<String>,
    pub hue: Option<String>,
    pub percent: Option<f64>,
    pub css3: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformedBatch {
    pub metadata: Vec<MetadataRow>,
    pub media: Vec<MediaRow>,
    pub colors: Vec<ColorRow>,
}

impl TransformedBatch {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.media.is_empty() && self.colors.is_empty()
    }
}

/// Output of one `collect`, held on disk until the next `migrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedBatch {
    pub manifest_version: u32,
    pub classification: String,
    pub collected_at: String,
    pub has_image_filter: bool,
    pub record_count: usize,
    pub batch: TransformedBatch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadCounts {
    pub metadata_inserted: usize,
    pub metadata_skipped: usize,
    pub media_inserted: usize,
    pub colors_inserted: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub metadata: i64,
    pub media: i64,
    pub colors: i64,
}

impl TableCounts {
    pub fn is_empty(&self) -> bool {
        self.metadata == 0 && self.media == 0 && self.colors == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigratePaths {
    pub cache_root: String,
    pub batch_path: String,
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrateRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub classification: String,
    pub collected_at: String,
    pub record_count: usize,
    pub paths: MigratePaths,
    pub inserted: LoadCounts,
    pub totals: TableCounts,
}
