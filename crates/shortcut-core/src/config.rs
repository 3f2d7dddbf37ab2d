//! Shell configuration

use std::path::PathBuf;

use shortcut_storage::CONFIG_FILE_NAME;

/// Overrides every other location when set
pub const CONFIG_DIR_ENV: &str = "SIMPLE_SHORTCUT_CONFIG_DIR";

const APP_DIR_NAME: &str = "simple-shortcut";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Path to the JSON configuration document
    pub config_path: PathBuf,
}

impl ShellConfig {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
        }
    }

    /// Pick the config directory: env override, then `preferred`, then the platform default
    pub fn resolve(preferred: Option<PathBuf>) -> Self {
        let dir = std::env::var_os(CONFIG_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or(preferred)
            .unwrap_or_else(Self::config_dir);

        tracing::debug!(dir = %dir.display(), "Resolved configuration directory");
        Self::new(dir)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".simple-shortcut"))
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

// Per-user configuration directory for each platform
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
