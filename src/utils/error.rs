use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Ledger error: {message}")]
    LedgerError { message: String },
}

impl ParkError {
    pub fn ledger(message: impl Into<String>) -> Self {
        ParkError::LedgerError {
            message: message.into(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ParkError::CsvError(_) => {
                "Check the CSV header is `driver,passengers,duration,cost,discount`"
            }
            ParkError::IoError(_) => "Make sure the input file exists and is readable",
            ParkError::SerializationError(_) => {
                "Check the JSON ledger has `drivers`, `passengers` and `trips` arrays"
            }
            ParkError::ConfigValidationError { .. }
            | ParkError::InvalidConfigValueError { .. }
            | ParkError::MissingConfigError { .. } => {
                "Review the configuration file or command line flags"
            }
            ParkError::LedgerError { .. } => {
                "Every trip must reference a listed driver and listed passengers"
            }
        }
    }

    /// Process exit code used by the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ParkError::ConfigValidationError { .. }
            | ParkError::InvalidConfigValueError { .. }
            | ParkError::MissingConfigError { .. } => 2,
            ParkError::LedgerError { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParkError>;
