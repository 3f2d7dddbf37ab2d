//! Native services backed by Tauri plugins

use futures_util::future::{BoxFuture, FutureExt};
use std::path::PathBuf;
use tauri::{AppHandle, WebviewWindow};
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_opener::OpenerExt;
use tokio::sync::oneshot;

use shortcut_core::{CoreError, HostShell, Result};

pub struct TauriShell {
    app: AppHandle,
}

impl TauriShell {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl HostShell for TauriShell {
    type Window = WebviewWindow;

    fn pick_folder(&self, window: &WebviewWindow) -> BoxFuture<'static, Result<Option<PathBuf>>> {
        let (tx, rx) = oneshot::channel();

        self.app
            .dialog()
            .file()
            .set_parent(window)
            .set_title("Select project folder")
            .pick_folder(move |folder| {
                let _ = tx.send(folder);
            });

        async move {
            let folder = rx
                .await
                .map_err(|_| CoreError::Host("Folder dialog closed unexpectedly".to_string()))?;

            folder
                .map(|f| f.into_path().map_err(|e| CoreError::Host(e.to_string())))
                .transpose()
        }
        .boxed()
    }

    fn open_url(&self, url: &str) -> BoxFuture<'static, Result<()>> {
        let result = self
            .app
            .opener()
            .open_url(url, None::<&str>)
            .map_err(|e| CoreError::Host(e.to_string()));

        if result.is_ok() {
            tracing::info!(url, "Opened URL in default handler");
        }
        async move { result }.boxed()
    }
}
