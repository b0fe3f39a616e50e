use crate::utils::error::{MapError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static ENV_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env reference pattern is valid"));

/// Optional TOML configuration file.
///
/// ```toml
/// [paths]
/// database = "data.sqlite3"
/// output_dir = "static/images/maps"
///
/// [maps]
/// endpoint = "https://maps.googleapis.com/maps/api/staticmap"
/// timeout_seconds = 15
/// api_key = "${GOOGLE_MAPS_API_KEY}"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub maps: MapsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub database: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapsSection {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for MapsSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsSection")
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| MapError::ConfigFileError {
            message: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| MapError::ConfigFileError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the variable's value. Unset variables are errors.
fn substitute_env_vars(content: &str) -> Result<String> {
    let mut missing = None;

    let result = ENV_REFERENCE.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| {
            missing.get_or_insert_with(|| var_name.to_string());
            String::new()
        })
    });

    match missing {
        Some(var_name) => Err(MapError::ConfigFileError {
            message: format!("environment variable {} is not set", var_name),
        }),
        None => Ok(result.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[paths]
database = "/srv/catalog/data.sqlite3"
output_dir = "/srv/catalog/maps"

[maps]
endpoint = "https://maps.example.com/staticmap"
timeout_seconds = 30
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.paths.database,
            Some(PathBuf::from("/srv/catalog/data.sqlite3"))
        );
        assert_eq!(
            config.maps.endpoint.as_deref(),
            Some("https://maps.example.com/staticmap")
        );
        assert_eq!(config.maps.timeout_seconds, Some(30));
        assert!(config.maps.api_key.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.paths.database.is_none());
        assert!(config.maps.endpoint.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EVENT_MAPS_TEST_KEY", "from-env");

        let config = FileConfig::from_toml_str(
            r#"
[maps]
api_key = "${EVENT_MAPS_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.maps.api_key.as_deref(), Some("from-env"));
        assert!(!format!("{:?}", config).contains("from-env"));

        std::env::remove_var("EVENT_MAPS_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_is_error() {
        let err = FileConfig::from_toml_str(
            r#"
[maps]
api_key = "${EVENT_MAPS_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("EVENT_MAPS_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::from_toml_str("[maps]\nzoom = 5\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[paths]\noutput_dir = \"./maps\"\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.paths.output_dir, Some(PathBuf::from("./maps")));
    }
}
