use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{UpdaterError, UpdaterResult};

const APP_DIR_NAME: &str = "autopatch";
const CONFIG_FILE: &str = "config.json";

/// Default release-listing host. Overridable for mirrors and tests.
pub const DEFAULT_RELEASES_API_BASE: &str = "https://api.github.com";

/// One independently versioned component to install: a plugin framework,
/// a font pack, a localization pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Release source in `owner/repo` form.
    pub repository: String,
    /// Regex matched against asset download URLs, anchored at the start.
    pub asset_pattern: String,
}

/// Updater settings, persisted as pretty-printed JSON.
///
/// Modules are processed strictly in the order listed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    pub modules: Vec<ModuleSpec>,
    /// Process name the guard checks before touching the install directory.
    pub game_executable: String,
    /// Optional explicit launch command; falls back to the game executable.
    pub launch_command: Option<Vec<String>>,
    /// Entries removed from the game directory on uninstall, relative names.
    pub cleanup_targets: Vec<String>,
    pub releases_api_base: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            modules: vec![ModuleSpec {
                repository: "BepInEx/BepInEx".to_string(),
                asset_pattern: r"https.*BepInEx-Unity\.IL2CPP-win-x64-6.*\.zip".to_string(),
            }],
            game_executable: String::new(),
            launch_command: None,
            cleanup_targets: [
                "BepInEx",
                "dotnet",
                "doorstop_config.ini",
                "winhttp.dll",
                ".doorstop_version",
                "changelog.txt",
                "Latest.log",
                "Player.log",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            releases_api_base: DEFAULT_RELEASES_API_BASE.to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Platform config location: `<os config dir>/autopatch/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE)
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable. A parse failure is logged, not fatal.
    pub fn load_or_default(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring unparseable config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> UpdaterResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| UpdaterError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| UpdaterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
