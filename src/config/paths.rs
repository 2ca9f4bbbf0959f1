//! Platform directory resolution.
//!
//! Settings live under the user's config directory and models under the
//! local data directory, both resolved through the `dirs` crate — so
//! `~/.config/speech-capture/settings.toml` and
//! `~/.local/share/speech-capture/models/` on Linux, with the usual
//! `Application Support` / `%APPDATA%` equivalents elsewhere.

use std::path::PathBuf;

const APP_NAME: &str = "speech-capture";

/// Every filesystem location the engine reads or writes.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// `settings.toml` itself.
    pub settings_file: PathBuf,
    /// Directory holding downloaded GGML files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    /// Resolve all paths for the current platform.
    ///
    /// When `dirs` cannot name a standard location the current directory
    /// stands in, which keeps portable installs working.
    pub fn new() -> Self {
        let config_dir = app_dir(dirs::config_dir());
        let settings_file = config_dir.join("settings.toml");
        let models_dir = app_dir(dirs::data_local_dir()).join("models");

        Self {
            config_dir,
            settings_file,
            models_dir,
        }
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
