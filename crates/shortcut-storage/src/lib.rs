//! Simple Shortcut Storage Layer
//!
//! A single pretty-printed JSON document holds every project and quick-access site.
//! The file is the only source of truth: nothing is cached between calls.

mod document;
mod error;
mod store;

pub use document::{ConfigDocument, Project, QuickAccessSite, SCHEMA_VERSION};
pub use error::StorageError;
pub use store::{merge_over_defaults, ConfigStore};

/// File name of the configuration document inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "simple-shortcut-config.json";

pub type Result<T> = std::result::Result<T, StorageError>;
