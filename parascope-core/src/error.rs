//! Error types for parascope

use thiserror::Error;

/// Main error type for parascope operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed geometry record: {0}")]
    MalformedRecord(String),

    #[error("compute service error: {0}")]
    Compute(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("viewer error: {0}")]
    Viewer(String),
}

/// Result type alias for parascope operations
pub type Result<T> = std::result::Result<T, Error>;
