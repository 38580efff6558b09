use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use crate::core::error::{UpdaterError, UpdaterResult};

/// Host-side collaborators the updater depends on but does not own:
/// detecting whether the game is running and starting it after an update.
pub trait GameHost: Send + Sync {
    fn is_game_running(&self) -> bool;
    fn launch_game(&self) -> UpdaterResult<()>;
}

/// Process-table backed [`GameHost`] used by the real product.
pub struct SystemGameHost {
    game_dir: PathBuf,
    executable: String,
    launch_command: Option<Vec<String>>,
}

impl SystemGameHost {
    pub fn new(
        game_dir: PathBuf,
        executable: String,
        launch_command: Option<Vec<String>>,
    ) -> Self {
        Self {
            game_dir,
            executable,
            launch_command,
        }
    }
}

impl GameHost for SystemGameHost {
    fn is_game_running(&self) -> bool {
        if self.executable.is_empty() {
            return false;
        }
        let target = self.executable.to_ascii_lowercase();

        let mut system = sysinfo::System::new_all();
        system.refresh_all();
        system
            .processes()
            .values()
            .any(|process| process.name().to_string_lossy().to_ascii_lowercase() == target)
    }

    fn launch_game(&self) -> UpdaterResult<()> {
        let mut cmd = match &self.launch_command {
            Some(parts) if !parts.is_empty() => {
                let mut cmd = Command::new(&parts[0]);
                cmd.args(&parts[1..]);
                cmd
            }
            _ => {
                if self.executable.is_empty() {
                    info!("No game executable configured; skipping launch");
                    return Ok(());
                }
                Command::new(self.game_dir.join(&self.executable))
            }
        };

        info!("Launching game from {:?}", self.game_dir);
        cmd.current_dir(&self.game_dir)
            .spawn()
            .map_err(|source| UpdaterError::Io {
                path: self.game_dir.clone(),
                source,
            })?;

        Ok(())
    }
}
