use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Lookup request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Lookup resource returned HTTP {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SurveyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SurveyError::NetworkError(_) | SurveyError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            SurveyError::IoError(_) => ErrorCategory::Storage,
            SurveyError::SerializationError(_) => ErrorCategory::Data,
            SurveyError::MissingConfigError { .. }
            | SurveyError::InvalidConfigValueError { .. }
            | SurveyError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 查詢失敗只影響 ZIP 欄位
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SurveyError::NetworkError(_) | SurveyError::HttpStatusError { .. } => {
                "The ZIP lookup table could not be loaded.".to_string()
            }
            SurveyError::IoError(e) => format!("A local file could not be accessed: {}", e),
            SurveyError::SerializationError(_) => {
                "The ZIP lookup table is not valid JSON.".to_string()
            }
            SurveyError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing.", field)
            }
            SurveyError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            SurveyError::ConfigValidationError { field, message } => {
                format!("Setting '{}' could not be read: {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that lookup.resource points at a reachable zipcodes.json"
            }
            ErrorCategory::Storage => "Check permissions on the preference and answers files",
            ErrorCategory::Data => {
                "Make sure the lookup resource has the shape {\"zipcodes\": [...]}"
            }
            ErrorCategory::Configuration => "Review the survey configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
