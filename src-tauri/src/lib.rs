//! Simple Shortcut - Tauri Application
//!
//! - Rust owns the configuration file
//! - The webview reaches it only through the bridge operations

mod commands;
mod host;
mod state;

use commands::{BRIDGE_NAMESPACE, DISPATCH_COMMAND, MAIN_WINDOW_LABEL};
use shortcut_core::{bridge, ShellConfig};
use state::AppState;
use tauri::{
    AppHandle, Manager, RunEvent, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window,
    WindowEvent,
};

/// Show the main window, creating it if needed, and bind it to the dispatcher
fn show_main_window(app: &AppHandle) -> anyhow::Result<()> {
    let window = match app.get_webview_window(MAIN_WINDOW_LABEL) {
        Some(window) => {
            window.show()?;
            window.set_focus()?;
            window
        }
        None => build_main_window(app)?,
    };

    app.state::<AppState>().dispatcher().initialize(window)?;
    Ok(())
}

fn build_main_window(app: &AppHandle) -> tauri::Result<WebviewWindow> {
    let script = bridge::proxy_script(BRIDGE_NAMESPACE, DISPATCH_COMMAND);

    let url = WebviewUrl::App("index.html".into());
    let builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, url)
        .title("Simple Shortcut")
        .inner_size(1000.0, 700.0)
        .initialization_script(&script);

    #[cfg(target_os = "macos")]
    let builder = builder.title_bar_style(tauri::TitleBarStyle::Overlay);

    let window = builder.build()?;
    tracing::debug!(label = MAIN_WINDOW_LABEL, "Created main window");
    Ok(window)
}

fn on_window_event(window: &Window, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }

    // macOS apps keep running in the background when their window is closed
    if let WindowEvent::CloseRequested { api, .. } = event {
        if cfg!(target_os = "macos") {
            api.prevent_close();
            if let Err(e) = window.hide() {
                tracing::warn!(error = %e, "Failed to hide main window");
            }
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    shortcut_core::init_logging();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = ShellConfig::resolve(app.path().app_config_dir().ok());
            app.manage(AppState::new(&config, app.handle().clone()));

            show_main_window(app.handle())?;

            // Nothing can be running yet; discard state left by a previous process
            app.state::<AppState>().projects().reset_running_flags();

            tracing::info!("Simple Shortcut started");
            Ok(())
        })
        .on_window_event(on_window_event)
        .invoke_handler(tauri::generate_handler![
            // Diagnostics
            commands::diagnostics::frontend_ready,
            // Bridge
            commands::dispatch::dispatch,
        ])
        .build(tauri::generate_context!())
        .expect("error while building Simple Shortcut");

    app.run(|app, event| match event {
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            if let Err(e) = show_main_window(app) {
                tracing::error!(error = %e, "Failed to reopen main window");
            }
        }
        RunEvent::Exit => tracing::info!("Simple Shortcut exiting"),
        _ => {}
    });
}
