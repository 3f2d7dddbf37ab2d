//! Shared state owned by the process entry point

use parking_lot::RwLock;

use shortcut_storage::ConfigStore;

use crate::host::HostShell;
use crate::manager::{ProjectManager, QuickAccessManager};

pub struct ShellContext<H: HostShell> {
    store: ConfigStore,
    projects: ProjectManager,
    quick_access_sites: QuickAccessManager,
    host: H,
    /// Window that native dialogs attach to; replaced whenever the window is recreated
    window: RwLock<Option<H::Window>>,
}

impl<H: HostShell> ShellContext<H> {
    pub fn new(store: ConfigStore, host: H) -> Self {
        Self {
            projects: ProjectManager::new(store.clone()),
            quick_access_sites: QuickAccessManager::new(store.clone()),
            store,
            host,
            window: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn projects(&self) -> &ProjectManager {
        &self.projects
    }

    pub fn quick_access_sites(&self) -> &QuickAccessManager {
        &self.quick_access_sites
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn bind_window(&self, window: H::Window) {
        *self.window.write() = Some(window);
    }

    pub fn window(&self) -> Option<H::Window> {
        self.window.read().clone()
    }
}
