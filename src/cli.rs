use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_ENDPOINT: &str = "https://api.harvardartmuseums.org/object";

#[derive(Parser, Debug)]
#[command(
    name = "artifacts",
    version,
    about = "Collect museum artifact records into sqlite and run the analysis catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one classification from the collection API and stage it for migration.
    Collect(CollectArgs),
    /// Insert the staged batch into the sqlite store.
    Migrate(MigrateArgs),
    /// List or run the fixed analysis queries.
    Query(QueryArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    #[arg(long, default_value = ".cache/artifacts")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub batch_path: Option<PathBuf>,

    #[arg(long)]
    pub classification: String,

    #[arg(long, env = "HARVARD_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value_t = 2500)]
    pub max_records: usize,

    #[arg(long, default_value_t = 100)]
    pub page_size: usize,

    #[arg(long, default_value_t = false)]
    pub has_image: bool,

    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    #[arg(long, default_value = ".cache/artifacts")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub batch_path: Option<PathBuf>,

    #[arg(long)]
    pub run_manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(long, default_value = ".cache/artifacts")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Query number (1-25), title, or numbered label.
    pub selector: Option<String>,

    #[arg(long)]
    pub artifact_id: Option<i64>,

    #[arg(long, default_value_t = false)]
    pub list: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/artifacts")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub batch_path: Option<PathBuf>,
}
