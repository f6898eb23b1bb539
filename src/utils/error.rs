use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Workbook error: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("PDF error: {0}")]
    PdfError(#[from] lopdf::Error),

    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Sheet '{sheet}' not found in workbook")]
    MissingSheetError { sheet: String },

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumnError { sheet: String, column: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Output,
    Configuration,
    Data,
    Database,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AgroError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::WorkbookError(_) | Self::MissingSheetError { .. } => ErrorCategory::Input,
            Self::PdfError(_) | Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Output,
            #[cfg(feature = "postgres")]
            Self::DatabaseError(_) => ErrorCategory::Database,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_)
            | Self::MissingColumnError { .. }
            | Self::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingColumnError { .. } => ErrorSeverity::Low,
            Self::ApiError(_) => ErrorSeverity::Medium,
            #[cfg(feature = "postgres")]
            Self::DatabaseError(_) => ErrorSeverity::Medium,
            Self::IoError(_) | Self::PdfError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit code: warnings still succeed, retryable errors are 2,
    /// system errors 3.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Logs the failure with its classification and tells the user what to
    /// check next.
    pub fn report(&self, what: &str) {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            what,
            self,
            self.category(),
            self.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", self.recovery_suggestion());

        eprintln!("❌ {}", self.user_friendly_message());
        eprintln!("💡 Suggestion: {}", self.recovery_suggestion());
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the report API is running and reachable at the configured base URL"
            }
            ErrorCategory::Input => {
                "Make sure the workbook exists, is a valid .xlsx file and contains the expected sheets"
            }
            ErrorCategory::Output => "Check that the output directory exists and is writable",
            ErrorCategory::Configuration => {
                "Review the command-line arguments and the TOML configuration file"
            }
            ErrorCategory::Data => "Inspect the source data for missing or malformed values",
            ErrorCategory::Database => {
                "Verify the connection string (DATABASE_URL) and that the server accepts connections"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_timeout() => "The report API did not answer in time".to_string(),
            Self::ApiError(e) if e.is_connect() => "Could not connect to the report API".to_string(),
            Self::MissingSheetError { sheet } => format!("The workbook has no sheet named '{}'", sheet),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing required setting '{}'", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_severities() {
        let missing = AgroError::MissingSheetError {
            sheet: "Bancos".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Input);
        assert_eq!(missing.severity(), ErrorSeverity::High);
        assert!(missing.user_friendly_message().contains("Bancos"));

        let io = AgroError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(io.category(), ErrorCategory::Output);
        assert_eq!(io.severity(), ErrorSeverity::Critical);

        let column = AgroError::MissingColumnError {
            sheet: "21-22".to_string(),
            column: "CULTURA".to_string(),
        };
        assert_eq!(column.severity(), ErrorSeverity::Low);
        assert_eq!(column.category(), ErrorCategory::Data);

        assert_eq!(column.exit_code(), 0);
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_processing_helper() {
        let err = AgroError::processing("bad row");
        assert_eq!(err.to_string(), "Data processing error: bad row");
        assert!(!err.recovery_suggestion().is_empty());
    }
}
