use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::core::error::{UpdaterError, UpdaterResult};

/// File name of the persisted install history inside the game directory.
pub const HISTORY_FILE: &str = "patch_history.json";

/// Persisted record of the last successfully installed asset URL per module.
///
/// Loaded once per run, mutated in memory while a plan executes, and written
/// back only after every task in the plan has succeeded. The on-disk file
/// therefore never names a module whose download+extract pair did not both
/// complete.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl HistoryLedger {
    /// Open the ledger stored in `game_dir`. A missing file is the normal
    /// first-run condition and yields an empty ledger.
    pub fn for_game_dir(game_dir: &Path) -> UpdaterResult<Self> {
        Self::load(game_dir.join(HISTORY_FILE))
    }

    pub fn load(path: PathBuf) -> UpdaterResult<Self> {
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    entries: BTreeMap::new(),
                });
            }
            Err(source) => return Err(UpdaterError::Io { path, source }),
        };

        let entries = serde_json::from_str(&raw).map_err(|source| UpdaterError::CorruptLedger {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, entries })
    }

    pub fn get(&self, module: &str) -> Option<&str> {
        self.entries.get(module).map(String::as_str)
    }

    /// In-memory staging only; nothing reaches disk until [`save`](Self::save).
    pub fn set(&mut self, module: &str, url: &str) {
        self.entries.insert(module.to_string(), url.to_string());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the whole mapping atomically: write a uniquely named sibling
    /// file, then rename it over the target so readers never observe a
    /// half-written ledger.
    pub fn save(&self) -> UpdaterResult<()> {
        let payload =
            serde_json::to_string_pretty(&self.entries).map_err(|e| UpdaterError::PersistFailure {
                path: self.path.clone(),
                source: e.into(),
            })?;

        let staging = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4()));
        std::fs::write(&staging, payload).map_err(|source| UpdaterError::PersistFailure {
            path: staging.clone(),
            source,
        })?;

        if let Err(source) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(UpdaterError::PersistFailure {
                path: self.path.clone(),
                source,
            });
        }

        info!("History saved: {} modules -> {:?}", self.entries.len(), self.path);
        Ok(())
    }
}
