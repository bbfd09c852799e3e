use thiserror::Error;

/// Error type that captures transaction history failures.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid folio access")]
    InvalidFolioAccess,
}

pub type HistoryResult<T> = Result<T, HistoryError>;
