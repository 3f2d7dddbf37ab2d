//! Application state management
use std::sync::Arc;
use tauri::AppHandle;

use shortcut_core::{CommandDispatcher, ConfigStore, ProjectManager, ShellConfig, ShellContext};

use crate::host::TauriShell;

/// Owned by the Tauri app; shared with every command
pub struct AppState {
    dispatcher: Arc<CommandDispatcher<TauriShell>>,
}

impl AppState {
    pub fn new(config: &ShellConfig, app: AppHandle) -> Self {
        let store = ConfigStore::new(&config.config_path);
        let context = Arc::new(ShellContext::new(store, TauriShell::new(app)));

        tracing::info!(path = %config.config_path.display(), "Using configuration file");

        Self {
            dispatcher: Arc::new(CommandDispatcher::new(context)),
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher<TauriShell> {
        &self.dispatcher
    }

    pub fn projects(&self) -> &ProjectManager {
        self.dispatcher.context().projects()
    }
}
