#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use file::FileConfig;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_secret, validate_url, Validate,
};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_DATABASE: &str = "data.sqlite3";
pub const DEFAULT_OUTPUT_DIR: &str = "static/images/maps";

/// Map service credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub endpoint: String,
    pub api_key: ApiKey,
    pub timeout: Duration,
}

impl MapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: ApiKey::new(api_key),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Validate for MapsConfig {
    fn validate(&self) -> Result<()> {
        validate_url("maps.endpoint", &self.endpoint)?;
        validate_secret(API_KEY_ENV, self.api_key.expose())?;
        validate_positive_number("maps.timeout_ms", self.timeout.as_millis() as u64, 1)?;
        Ok(())
    }
}

/// Fully resolved settings for one batch run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: PathBuf,
    pub output_dir: PathBuf,
    pub maps: MapsConfig,
    pub force: bool,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("paths.database", &self.database.to_string_lossy())?;
        validate_path("paths.output_dir", &self.output_dir.to_string_lossy())?;
        if let Some(report) = &self.report {
            validate_path("report", &report.to_string_lossy())?;
        }
        self.maps.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_redacted() {
        let config = MapsConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("ApiKey(***)"));
    }

    #[test]
    fn test_maps_config_validation() {
        assert!(MapsConfig::new("key").validate().is_ok());
        assert!(MapsConfig::new(" ").validate().is_err());
        assert!(MapsConfig::new("key")
            .with_endpoint("not a url")
            .validate()
            .is_err());
        assert!(MapsConfig::new("key")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
