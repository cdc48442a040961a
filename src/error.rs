use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern Error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Malformed Timestamp: {0}")]
    Timestamp(String),
}

pub type MfResult<T> = Result<T, MatchForgeError>;
