use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed {dataset} dataset at row {row}: {message}")]
    DatasetError {
        dataset: String,
        row: usize,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn dataset(dataset: &str, row: usize, message: impl Into<String>) -> Self {
        DashboardError::DatasetError {
            dataset: dataset.to_string(),
            row,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DashboardError::CsvError(_) | DashboardError::DatasetError { .. } => {
                ErrorCategory::Data
            }
            DashboardError::IoError(_) => ErrorCategory::Io,
            DashboardError::SerializationError(_) | DashboardError::PatternError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Internal => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashboardError::CsvError(_) => {
                "Check that the data files are CSV with a header row and the expected delimiter"
                    .to_string()
            }
            DashboardError::IoError(_) => {
                "Check that the data files exist and are readable".to_string()
            }
            DashboardError::SerializationError(_) => {
                "Try the plain text output format instead".to_string()
            }
            DashboardError::PatternError(_) => "Simplify the search keywords".to_string(),
            DashboardError::ConfigValidationError { .. } => {
                "Review the configuration file or command line flags".to_string()
            }
            DashboardError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            DashboardError::DatasetError { dataset, row, .. } => format!(
                "Fix row {} of the {} dataset and reload",
                row, dataset
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not load the datasets: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Internal => format!("Unexpected failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_display() {
        let err = DashboardError::dataset("doctors", 3, "rating 7 is outside 0..=5");
        assert_eq!(
            err.to_string(),
            "Malformed doctors dataset at row 3: rating 7 is outside 0..=5"
        );
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("row 3"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: DashboardError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "doctors.csv").into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("File access failed"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = DashboardError::ConfigValidationError {
            field: "view.page_size".to_string(),
            message: "expected an integer".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(ErrorSeverity::Medium < err.severity());
    }
}
