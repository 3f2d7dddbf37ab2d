//! Tauri IPC Commands
//!
//! The webview reaches every operation through `dispatch`; the proxy object
//! installed in each window only forwards names and arguments.

pub mod diagnostics;
pub mod dispatch;

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Global object the proxy script defines in the webview
pub const BRIDGE_NAMESPACE: &str = "shortcutAPI";

/// Name of the IPC command the proxy forwards to
pub const DISPATCH_COMMAND: &str = "dispatch";
