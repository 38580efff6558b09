use std::path::Path;

use tracing::info;

use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::history::HISTORY_FILE;

/// Remove previously installed entries from the game directory.
///
/// `targets` are names relative to `game_dir`; directories are removed
/// recursively, files unlinked. The history ledger file is always included.
/// Missing entries are skipped. Returns how many entries were removed.
pub fn remove_installed_files(game_dir: &Path, targets: &[String]) -> UpdaterResult<usize> {
    let mut removed = 0;

    for name in targets.iter().map(String::as_str).chain([HISTORY_FILE]) {
        let path = game_dir.join(name);
        if path.is_dir() {
            std::fs::remove_dir_all(&path).map_err(|source| UpdaterError::Io {
                path: path.clone(),
                source,
            })?;
        } else if path.exists() {
            std::fs::remove_file(&path).map_err(|source| UpdaterError::Io {
                path: path.clone(),
                source,
            })?;
        } else {
            continue;
        }
        info!("Removed {:?}", path);
        removed += 1;
    }

    Ok(removed)
}
