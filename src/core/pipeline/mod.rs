pub mod controller;

pub use controller::{PipelineState, TaskPipeline};

use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Progress and lifecycle messages emitted while a plan executes.
///
/// `Progress` is task-local percent, reset at every `TaskStarted`; consumers
/// wanting a plan-wide figure combine it with `index`/`total`. Exactly one of
/// `Finished` or `Aborted` terminates a run that started.
#[derive(Debug, Clone, Serialize)]
pub enum PipelineEvent {
    TaskStarted {
        index: usize,
        total: usize,
        label: String,
    },
    Progress(u8),
    TaskFinished {
        index: usize,
    },
    Finished,
    Aborted {
        message: String,
    },
}

/// Sending half of the event channel. Sends are fire-and-forget: a headless
/// caller may drop the receiver and nothing in the pipeline will care.
pub type EventSender = UnboundedSender<PipelineEvent>;

pub fn event_channel() -> (EventSender, UnboundedReceiver<PipelineEvent>) {
    unbounded_channel()
}
