//! Host services the dispatcher needs from the windowing runtime

use futures_util::future::BoxFuture;
use std::path::PathBuf;

use crate::Result;

pub trait HostShell: Send + Sync + 'static {
    /// Handle to a native window that dialogs can be parented to
    type Window: Clone + Send + Sync + 'static;

    /// Show a directory picker. `Ok(None)` means the user cancelled.
    fn pick_folder(&self, window: &Self::Window) -> BoxFuture<'static, Result<Option<PathBuf>>>;

    /// Open a URL with the OS default handler
    fn open_url(&self, url: &str) -> BoxFuture<'static, Result<()>>;
}
