use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Internal(format!("JSON encoding failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for InsightError {
    fn from(err: tokio::task::JoinError) -> Self {
        InsightError::Internal(format!("analysis task failed: {}", err))
    }
}
