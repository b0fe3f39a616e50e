use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration file error: {message}")]
    ConfigFileError { message: String },

    #[error("Data store error: {0}")]
    DataAccessError(#[from] sqlx::Error),

    #[error("Map request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Map service returned {status}: {body}")]
    MapServiceError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No location could be resolved for event '{slug}'")]
    UnresolvableLocation { slug: String },

    #[error("Slug '{slug}' cannot be used as a file name")]
    InvalidSlug { slug: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MapError::UnresolvableLocation { .. } | MapError::InvalidSlug { .. } => {
                ErrorSeverity::Low
            }
            MapError::HttpError(_) | MapError::MapServiceError { .. } => ErrorSeverity::Medium,
            MapError::IoError(_) => ErrorSeverity::High,
            MapError::MissingConfigError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::ConfigFileError { .. }
            | MapError::DataAccessError(_) => ErrorSeverity::Critical,
        }
    }

    /// Fatal errors abort the whole run; everything else is recorded per event.
    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MapError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            MapError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            MapError::ConfigFileError { message } => {
                format!("Could not load configuration file: {}", message)
            }
            MapError::DataAccessError(_) => "Could not read events from the database".to_string(),
            MapError::HttpError(e) if e.is_timeout() => {
                "The map service did not answer in time".to_string()
            }
            MapError::HttpError(_) => "Could not reach the map service".to_string(),
            MapError::MapServiceError { status, .. } => {
                format!("The map service rejected the request (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::MissingConfigError { .. } => {
                "Export GOOGLE_MAPS_API_KEY or set maps.api_key in the config file"
            }
            MapError::InvalidConfigValueError { .. } | MapError::ConfigFileError { .. } => {
                "Check the command line flags and the TOML configuration file"
            }
            MapError::DataAccessError(_) => {
                "Check that --database points at an existing SQLite file with an events table"
            }
            MapError::HttpError(_) => "Check network connectivity and rerun the batch",
            MapError::MapServiceError { .. } => {
                "Verify the API key and that the Static Maps API is enabled for it"
            }
            MapError::IoError(_) => "Check that the output directory is writable",
            MapError::UnresolvableLocation { .. } => {
                "Give the event a name, country or a place in its description"
            }
            MapError::InvalidSlug { .. } => "Use a slug without path separators",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
