use thiserror::Error;

#[derive(Error, Debug)]
pub enum DealMetricsError {
    #[error("Unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Expected a JSON array of objects for {kind} import, found {found}")]
    UnexpectedJsonShape { kind: String, found: String },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DealMetricsError>;
