use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Lookup task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Error while looking up character {name}-{realm}: {source}")]
    LookupFailed {
        name: String,
        realm: String,
        #[source]
        source: Box<TallyError>,
    },

    #[error("Settings error: {message}")]
    SettingsError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TallyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TallyError::ApiError(_) | TallyError::HttpStatusError { .. } => ErrorCategory::Network,
            TallyError::LookupFailed { source, .. } => source.category(),
            TallyError::UrlError(_)
            | TallyError::ConfigError { .. }
            | TallyError::ConfigValidationError { .. }
            | TallyError::InvalidConfigValueError { .. }
            | TallyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TallyError::CsvError(_)
            | TallyError::SerializationError(_)
            | TallyError::SettingsError { .. }
            | TallyError::ProcessingError { .. }
            | TallyError::ValidationError { .. } => ErrorCategory::Data,
            TallyError::IoError(_) | TallyError::TaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TallyError::HttpStatusError { status: 404, .. } => {
                "Check the character name and realm spelling"
            }
            TallyError::LookupFailed { source, .. } => source.recovery_suggestion(),
            TallyError::ApiError(_) | TallyError::HttpStatusError { .. } => {
                "Check your network connection and the API base URL, then retry"
            }
            TallyError::UrlError(_) => "Check lookup.base_url in the configuration file",
            TallyError::ConfigError { .. }
            | TallyError::ConfigValidationError { .. }
            | TallyError::InvalidConfigValueError { .. }
            | TallyError::MissingConfigError { .. } => "Fix the configuration file and run again",
            TallyError::SerializationError(_) => {
                "The API response had an unexpected shape; the API may have changed"
            }
            TallyError::SettingsError { .. } => "Inspect or delete the settings file",
            TallyError::ValidationError { .. } => "Names may only contain letters, ids only digits",
            TallyError::CsvError(_) | TallyError::ProcessingError { .. } => {
                "Re-run with --verbose for details"
            }
            TallyError::IoError(_) => "Check file permissions and free disk space",
            TallyError::TaskError(_) => "Re-run the lookup",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TallyError::LookupFailed { name, realm, .. } => {
                format!("Error while looking up character {}-{}", name, realm)
            }
            TallyError::HttpStatusError { status, .. } => {
                format!("The game API answered with HTTP {}", status)
            }
            TallyError::ApiError(_) => "Could not reach the game API".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
