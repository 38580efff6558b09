// ─── Update Orchestrator ───
// Drives one full run: guard, resolve, plan, execute, record, launch.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::cleanup;
use crate::core::config::UpdaterConfig;
use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::history::HistoryLedger;
use crate::core::pipeline::{EventSender, TaskPipeline};
use crate::core::platform::GameHost;
use crate::core::release::{self, ReleaseSource};
use crate::core::tasks::Task;

/// Outcome summary handed to the presentation layer after a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    /// Modules whose new asset was downloaded and extracted this run.
    pub installed: Vec<String>,
    /// Modules skipped: already current, or resolution yielded nothing.
    pub skipped: Vec<String>,
    pub cleaned: bool,
}

pub struct UpdateOrchestrator<S, H> {
    config: UpdaterConfig,
    game_dir: PathBuf,
    source: S,
    host: H,
    client: reqwest::Client,
    events: EventSender,
}

impl<S: ReleaseSource, H: GameHost> UpdateOrchestrator<S, H> {
    pub fn new(
        config: UpdaterConfig,
        game_dir: PathBuf,
        source: S,
        host: H,
        client: reqwest::Client,
        events: EventSender,
    ) -> Self {
        Self {
            config,
            game_dir,
            source,
            host,
            client,
            events,
        }
    }

    /// Update every configured module whose newest release differs from the
    /// one recorded in the history ledger.
    ///
    /// With `clean_first`, previously installed files are removed and the
    /// ledger cleared before planning, so every module reinstalls.
    ///
    /// The ledger is persisted only after the whole plan has succeeded; an
    /// aborted pipeline leaves the on-disk ledger exactly as it was. A
    /// persist failure after a successful pipeline is surfaced as
    /// [`UpdaterError::PersistFailure`] and the launch trigger is withheld,
    /// so callers can tell "installed but unrecorded" from a clean finish.
    pub async fn run_update(&self, clean_first: bool) -> UpdaterResult<UpdateReport> {
        self.ensure_game_stopped()?;

        let mut ledger = HistoryLedger::for_game_dir(&self.game_dir)?;
        let mut report = UpdateReport::default();

        if clean_first {
            report.cleaned = self.clean_installation(&mut ledger)?;
        }

        info!("Install directory: {:?}", self.game_dir);

        let mut plan: Vec<Task> = Vec::new();
        for module in &self.config.modules {
            let Some(asset) = release::resolve_latest(&self.source, module).await else {
                report.skipped.push(module.repository.clone());
                continue;
            };

            if ledger.get(&module.repository) == Some(asset.download_url.as_str()) {
                info!("Module {} is already current", module.repository);
                report.skipped.push(module.repository.clone());
                continue;
            }

            info!("Updating {} from {}", module.repository, asset.download_url);
            let dest = staging_path(&module.repository);
            plan.push(Task::Download {
                url: asset.download_url.clone(),
                digest: asset.digest.clone(),
                dest: dest.clone(),
            });
            plan.push(Task::Extract {
                archive: dest,
                output_dir: self.game_dir.clone(),
            });
            // Staged in memory; reaches disk only after the plan succeeds.
            ledger.set(&module.repository, &asset.download_url);
            report.installed.push(module.repository.clone());
        }

        if plan.is_empty() {
            info!("Nothing to download");
            self.host.launch_game()?;
            return Ok(report);
        }

        let mut pipeline = TaskPipeline::new(plan);
        pipeline.run(&self.client, &self.events).await?;

        ledger.save()?;
        info!("All modules installed");
        self.host.launch_game()?;

        Ok(report)
    }

    /// Remove every installed module, the support files and the ledger.
    /// Returns whether anything was recorded to remove.
    pub fn remove_installation(&self) -> UpdaterResult<bool> {
        self.ensure_game_stopped()?;
        let mut ledger = HistoryLedger::for_game_dir(&self.game_dir)?;
        self.clean_installation(&mut ledger)
    }

    fn clean_installation(&self, ledger: &mut HistoryLedger) -> UpdaterResult<bool> {
        if ledger.is_empty() {
            info!("No installed modules recorded; nothing to remove");
            return Ok(false);
        }

        cleanup::remove_installed_files(&self.game_dir, &self.config.cleanup_targets)?;
        ledger.clear();
        info!("Installed modules removed from {:?}", self.game_dir);
        Ok(true)
    }

    /// Precondition for every state-changing entry point: refuse to touch the
    /// install directory while the game process is alive.
    fn ensure_game_stopped(&self) -> UpdaterResult<()> {
        if self.host.is_game_running() {
            warn!("Game process detected; refusing to run");
            return Err(UpdaterError::GameRunning);
        }
        Ok(())
    }
}

/// Unique scratch path for one module's archive in the platform temp dir.
fn staging_path(repository: &str) -> PathBuf {
    let name = repository.replace('/', "_");
    std::env::temp_dir().join(format!("autopatch_{}_{}.zip", name, Uuid::new_v4()))
}
