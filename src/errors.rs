use crate::decoder::DecodeError;
use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Chainstate LevelDB operations
    #[error("Database error: {0}")]
    Database(#[from] rusty_leveldb::Status),

    /// SQLite output
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record decoding that aborts the session
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A decoding worker panicked or its task failed
    #[error("Worker error: {0}")]
    Worker(String),

    /// User supplied data that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<hex::FromHexError> for AppError {
    fn from(err: hex::FromHexError) -> Self {
        AppError::InvalidInput(format!("Invalid hex: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Worker(err.to_string())
    }
}
