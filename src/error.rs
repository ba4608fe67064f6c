use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema error: required column '{column}' is missing")]
    Schema { column: String },

    #[error("Malformed timestamp at row {row}: {value}")]
    MalformedTimestamp { row: usize, value: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
