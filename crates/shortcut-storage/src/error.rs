//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unreadable or malformed content. Only ever logged; loading falls back to defaults.
    #[error("Unreadable configuration: {0}")]
    Read(String),

    #[error("Failed to replace configuration file: {0}")]
    Persist(#[source] std::io::Error),
}
