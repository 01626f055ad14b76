use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Cannot project {record} record: field '{field}' {reason}")]
    ProjectionError {
        record: String,
        field: String,
        reason: String,
    },

    #[error("{entity} '{id}' not found")]
    NotFoundError { entity: String, id: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden { user_id: String },

    #[error("{form} form rejected: {}", describe_fields(.errors))]
    FormRejected {
        form: String,
        errors: BTreeMap<String, String>,
    },

    #[error("Upload rejected: {reason}")]
    UploadRejected { reason: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Authorization,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GalleryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GalleryError::ApiError(_) | GalleryError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            GalleryError::ConfigError { .. }
            | GalleryError::MissingConfigError { .. }
            | GalleryError::InvalidConfigValueError { .. }
            | GalleryError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            GalleryError::CsvError(_)
            | GalleryError::SerializationError(_)
            | GalleryError::ProjectionError { .. }
            | GalleryError::NotFoundError { .. }
            | GalleryError::FormRejected { .. }
            | GalleryError::UploadRejected { .. } => ErrorCategory::Data,
            GalleryError::Unauthorized | GalleryError::Forbidden { .. } => {
                ErrorCategory::Authorization
            }
            GalleryError::IoError(_) | GalleryError::StorageError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GalleryError::NotFoundError { .. }
            | GalleryError::FormRejected { .. }
            | GalleryError::UploadRejected { .. } => ErrorSeverity::Low,
            GalleryError::ApiError(_)
            | GalleryError::HttpStatusError { .. }
            | GalleryError::StorageError { .. } => ErrorSeverity::Medium,
            GalleryError::CsvError(_)
            | GalleryError::SerializationError(_)
            | GalleryError::ProjectionError { .. }
            | GalleryError::Unauthorized
            | GalleryError::Forbidden { .. } => ErrorSeverity::High,
            GalleryError::IoError(_)
            | GalleryError::ConfigError { .. }
            | GalleryError::MissingConfigError { .. }
            | GalleryError::InvalidConfigValueError { .. }
            | GalleryError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    /// HTTP status an upload endpoint would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GalleryError::Unauthorized => 401,
            GalleryError::Forbidden { .. } => 403,
            GalleryError::UploadRejected { .. } | GalleryError::FormRejected { .. } => 400,
            GalleryError::NotFoundError { .. } => 404,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the record store: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
            ErrorCategory::Authorization => format!("Access denied: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GalleryError::ApiError(_) | GalleryError::HttpStatusError { .. } => {
                "Check --api-url and --api-key, then retry"
            }
            GalleryError::MissingConfigError { .. } => {
                "Pass --api-url or --snapshot, or set them in the config file"
            }
            GalleryError::ConfigError { .. }
            | GalleryError::InvalidConfigValueError { .. }
            | GalleryError::ConfigValidationError { .. } => "Fix the configuration value and retry",
            GalleryError::ProjectionError { .. }
            | GalleryError::SerializationError(_)
            | GalleryError::CsvError(_) => "Inspect the source records for malformed rows",
            GalleryError::NotFoundError { .. } => "Check the id with the `collectors` command",
            GalleryError::Unauthorized | GalleryError::Forbidden { .. } => {
                "Use the id of a profile with admin rights"
            }
            GalleryError::FormRejected { .. } => "Correct the listed fields and submit again",
            GalleryError::UploadRejected { .. } => "Upload a JPEG, PNG or WebP image under 5MB",
            GalleryError::IoError(_) | GalleryError::StorageError { .. } => {
                "Check the storage path and permissions"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

fn describe_fields(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}
