//! Simple Shortcut Core
//!
//! Record managers over the configuration store, and the command layer that
//! exposes them to the webview. Every remote call resolves to a success or
//! failure envelope; nothing crosses the process boundary as a fault.

pub mod bridge;
mod config;
mod context;
mod dispatcher;
mod envelope;
mod error;
mod host;
mod ids;
mod manager;
mod record;

pub use config::{ShellConfig, CONFIG_DIR_ENV};
pub use context::ShellContext;
pub use dispatcher::{Args, CommandDispatcher, DispatcherState};
pub use envelope::{wrap, CommandResult};
pub use error::{CoreError, RecordKind};
pub use host::HostShell;
pub use ids::generate_id;
pub use manager::{ProjectManager, QuickAccessManager, RecordManager};
pub use record::{
    ProjectDraft, ProjectPatch, QuickAccessSiteDraft, QuickAccessSitePatch, Record,
};

pub use shortcut_storage::{
    ConfigDocument, ConfigStore, Project, QuickAccessSite, StorageError, CONFIG_FILE_NAME,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
