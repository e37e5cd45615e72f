use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid amount for {field}: {value} ({reason})")]
    InvalidAmount {
        field: String,
        value: f64,
        reason: String,
    },

    #[error(
        "Invalid number of installments: {value} (must be between 1 and {max})",
        max = crate::core::calculator::MAX_INSTALLMENTS
    )]
    InvalidScheduleLength { value: u32 },

    #[error("Invalid interest rate: {value} ({reason})")]
    InvalidRate { value: f64, reason: String },

    #[error("Calculation error: {message}")]
    CalculationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
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
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlanError::InvalidAmount { .. }
            | PlanError::InvalidScheduleLength { .. }
            | PlanError::InvalidRate { .. } => ErrorCategory::Input,
            PlanError::ConfigError { .. }
            | PlanError::ConfigValidationError { .. }
            | PlanError::InvalidConfigValueError { .. }
            | PlanError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlanError::IoError(_) => ErrorCategory::Io,
            PlanError::CalculationError { .. }
            | PlanError::SerializationError(_)
            | PlanError::CsvError(_) => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PlanError::InvalidAmount { field, .. } => format!(
                "Check {}: amounts must be finite, non-negative, and the down payment may not exceed the total",
                field
            ),
            PlanError::InvalidScheduleLength { .. } => {
                format!(
                    "Use between 1 and {} installments",
                    crate::core::calculator::MAX_INSTALLMENTS
                )
            }
            PlanError::InvalidRate { .. } => {
                "Give the monthly rate as a non-negative decimal fraction, e.g. 0.02 for 2%".to_string()
            }
            PlanError::CalculationError { .. } => {
                "Reduce the interest rate or the number of installments".to_string()
            }
            PlanError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            PlanError::SerializationError(_) | PlanError::CsvError(_) => {
                "Re-run with --verbose and report the failing plan".to_string()
            }
            PlanError::ConfigError { .. } | PlanError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and field names".to_string()
            }
            PlanError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of {}", field)
            }
            PlanError::MissingConfigError { field } => {
                format!("Add {} to the configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The payment plan input was rejected: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Io => format!("Could not read or write a file: {}", self),
            ErrorCategory::Processing => format!("The payment plan could not be produced: {}", self),
        }
    }

    /// Exit code used by the binaries; 0 means the failure is only a warning.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
