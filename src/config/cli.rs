use crate::config::{
    AppConfig, FileConfig, MapsConfig, API_KEY_ENV, DEFAULT_DATABASE, DEFAULT_ENDPOINT,
    DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT_SECONDS,
};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "event-maps")]
#[command(about = "Generate static map thumbnails for cataloged events")]
pub struct CliConfig {
    /// Re-fetch and overwrite images that already exist
    #[arg(long)]
    pub force: bool,

    /// Resolve and print map centers without fetching anything
    #[arg(long)]
    pub dry_run: bool,

    /// SQLite database holding events and event blocks
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Directory the <slug>.png files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Static map service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// Merges flags, the optional config file and the process environment.
    pub fn resolve(&self) -> Result<AppConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        self.resolve_with(file, std::env::var(API_KEY_ENV).ok())
    }

    /// Flag > file > default. The key comes from the file when it names one.
    pub fn resolve_with(&self, file: FileConfig, env_api_key: Option<String>) -> Result<AppConfig> {
        let api_key = file
            .maps
            .api_key
            .or(env_api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MapError::MissingConfigError {
                field: API_KEY_ENV.to_string(),
            })?;

        let endpoint = self
            .endpoint
            .clone()
            .or(file.maps.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let timeout_seconds = self
            .timeout_seconds
            .or(file.maps.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        let config = AppConfig {
            database: self
                .database
                .clone()
                .or(file.paths.database)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            output_dir: self
                .output_dir
                .clone()
                .or(file.paths.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            maps: MapsConfig::new(api_key)
                .with_endpoint(endpoint)
                .with_timeout(Duration::from_secs(timeout_seconds)),
            force: self.force,
            dry_run: self.dry_run,
            report: self.report.clone(),
        };

        config.validate()?;
        Ok(config)
    }
}
