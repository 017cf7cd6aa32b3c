//! Error types for the application

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Step sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("Invalid step reading: {0}")]
    InvalidReading(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
