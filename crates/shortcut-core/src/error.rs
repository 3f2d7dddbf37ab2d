//! Core error types

use std::fmt;
use thiserror::Error;

use shortcut_storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    QuickAccessSite,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Project => write!(f, "Project"),
            RecordKind::QuickAccessSite => write!(f, "Quick access site"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Failed to save configuration: {0}")]
    Persistence(#[from] StorageError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Main window is not available")]
    NoWindow,

    #[error("Operation already registered: {0}")]
    DuplicateRegistration(String),
}

impl CoreError {
    pub fn not_found(kind: RecordKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
