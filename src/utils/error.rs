use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("No record with roll number '{roll_number}'")]
    NotFound { roll_number: String },

    #[error("School code mismatch for roll number '{roll_number}'")]
    Forbidden { roll_number: String },

    #[error("Data source request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Data source error: {message}")]
    UpstreamError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration defect in data source: {message}")]
    ConfigurationDefect { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Lookup,
    Authorization,
    Upstream,
    Configuration,
}

impl PortalError {
    pub fn upstream(message: impl Into<String>) -> Self {
        PortalError::UpstreamError {
            message: message.into(),
        }
    }

    pub fn defect(message: impl Into<String>) -> Self {
        PortalError::ConfigurationDefect {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::InvalidInput { .. } => ErrorCategory::Input,
            PortalError::NotFound { .. } => ErrorCategory::Lookup,
            PortalError::Forbidden { .. } => ErrorCategory::Authorization,
            PortalError::HttpError(_)
            | PortalError::UpstreamError { .. }
            | PortalError::CsvError(_)
            | PortalError::IoError(_)
            | PortalError::SerializationError(_) => ErrorCategory::Upstream,
            PortalError::ConfigurationDefect { .. }
            | PortalError::ConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Input => StatusCode::BAD_REQUEST,
            ErrorCategory::Lookup => StatusCode::NOT_FOUND,
            ErrorCategory::Authorization => StatusCode::FORBIDDEN,
            ErrorCategory::Upstream | ErrorCategory::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 對呼叫端顯示的訊息，不包含任何內部細節
    pub fn user_friendly_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Both admission number and school code are required",
            ErrorCategory::Lookup => {
                "Student not found. Please check admission number and try again."
            }
            ErrorCategory::Authorization => "Invalid school code for this student.",
            ErrorCategory::Upstream | ErrorCategory::Configuration => {
                "Server error while fetching student data"
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PortalError::InvalidInput { .. } => "Provide both the roll number and the school code",
            PortalError::NotFound { .. } => "Check the roll number against the result sheet",
            PortalError::Forbidden { .. } => "Check the school code recorded for this student",
            PortalError::HttpError(_) | PortalError::UpstreamError { .. } => {
                "Check the spreadsheet id, sheet name and credentials, then retry"
            }
            PortalError::CsvError(_) | PortalError::IoError(_) => {
                "Check that the CSV file exists and has a header row"
            }
            PortalError::SerializationError(_) => "Check the data source response format",
            PortalError::ConfigurationDefect { .. } => {
                "Fix the sheet header: Roll_Number and School_Code columns are required"
            }
            PortalError::ConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. } => "Review the TOML configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
