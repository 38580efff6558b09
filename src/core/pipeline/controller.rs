// ─── Task Pipeline ───
// Sequential, progress-reporting execution of an ordered task queue.

use reqwest::Client;
use tracing::{error, info};

use super::{EventSender, PipelineEvent};
use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::tasks::{self, Task};

/// Execution state of a [`TaskPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running(usize),
    Finished,
    Aborted,
}

/// Runs an ordered task queue, one task at a time, never reordered.
///
/// Extraction for a module depends on its download having fully completed,
/// so tasks must not run concurrently; a side effect is that no two tasks
/// ever contend for the same path and progress stays unambiguous.
pub struct TaskPipeline {
    tasks: Vec<Task>,
    state: PipelineState,
}

impl TaskPipeline {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Execute the queue left to right.
    ///
    /// An empty queue transitions straight to `Finished` with no tasks run.
    /// The first failing task aborts the whole run: remaining tasks are never
    /// started and the failure is both emitted as a terminal `Aborted` event
    /// and returned to the caller.
    pub async fn run(&mut self, client: &Client, events: &EventSender) -> UpdaterResult<()> {
        let total = self.tasks.len();

        for index in 0..total {
            let task = self.tasks[index].clone();
            self.state = PipelineState::Running(index);
            info!("Task {}/{}: {}", index + 1, total, task.label());
            let _ = events.send(PipelineEvent::TaskStarted {
                index,
                total,
                label: task.label(),
            });
            let _ = events.send(PipelineEvent::Progress(0));

            if let Err(e) = execute(client, task, events).await {
                self.state = PipelineState::Aborted;
                error!("Task {}/{} failed: {}", index + 1, total, e);
                let _ = events.send(PipelineEvent::Aborted {
                    message: e.to_string(),
                });
                return Err(e);
            }

            let _ = events.send(PipelineEvent::Progress(100));
            let _ = events.send(PipelineEvent::TaskFinished { index });
        }

        self.state = PipelineState::Finished;
        info!("All {} tasks finished", total);
        let _ = events.send(PipelineEvent::Finished);
        Ok(())
    }
}

async fn execute(client: &Client, task: Task, events: &EventSender) -> UpdaterResult<()> {
    match task {
        Task::Download { url, digest, dest } => {
            tasks::download(client, &url, digest.as_deref(), &dest, events).await
        }
        Task::Extract {
            archive,
            output_dir,
        } => {
            // Archive work is blocking; keep it off the async worker.
            let events = events.clone();
            tokio::task::spawn_blocking(move || tasks::extract(&archive, &output_dir, &events))
                .await
                .map_err(|e| UpdaterError::Other(format!("Task join error: {e}")))?
        }
    }
}
