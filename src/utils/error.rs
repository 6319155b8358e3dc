use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Failed to parse configuration ({field}): {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Listing processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Serialization,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Serialization,
            Self::ConfigError { .. }
            | Self::ConfigParseError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ProcessingError { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Serialization => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Whether the error only affects a single listing rather than the run.
    pub fn is_listing_scoped(&self) -> bool {
        matches!(self, Self::ProcessingError { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IoError(_) => {
                "Check that the snapshot file exists and the output directory is writable".to_string()
            }
            Self::ZipError(_) => "Disable [load.compression] or free up disk space".to_string(),
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Check that the snapshot file is valid JSON in the expected shape".to_string()
            }
            Self::ConfigError { .. } | Self::ConfigParseError { .. } => {
                "Review the TOML configuration file for syntax errors".to_string()
            }
            Self::MissingConfigError { field } => {
                format!("Add a value for '{}' to the configuration", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration", field)
            }
            Self::ProcessingError { .. } => {
                "The listing was skipped; inspect its captured text in the snapshot".to_string()
            }
            Self::ValidationError { .. } => "Re-capture the snapshot and try again".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Serialization => format!("Could not process data: {}", self),
            ErrorCategory::Processing => format!("Listing could not be processed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = ScoutError::InvalidConfigValueError {
            field: "filters.price_tolerance".to_string(),
            value: "1.5".to_string(),
            reason: "must be in (0, 1]".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_listing_scoped());
        assert!(err.recovery_suggestion().contains("filters.price_tolerance"));
    }

    #[test]
    fn test_processing_errors_are_listing_scoped() {
        let err = ScoutError::ProcessingError {
            message: "bad href".to_string(),
        };
        assert!(err.is_listing_scoped());
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("bad href"));
    }
}
