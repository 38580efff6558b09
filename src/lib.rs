//! Backend core of the automatic game patch installer: resolve the newest
//! release asset per configured module, download and extract into the game
//! directory, and keep a ledger so repeated runs do no redundant work.

pub mod core;

pub use crate::core::config::{ModuleSpec, UpdaterConfig};
pub use crate::core::error::{UpdaterError, UpdaterResult};
pub use crate::core::history::{HistoryLedger, HISTORY_FILE};
pub use crate::core::http::build_http_client;
pub use crate::core::install::{UpdateOrchestrator, UpdateReport};
pub use crate::core::pipeline::{event_channel, PipelineEvent, PipelineState, TaskPipeline};
pub use crate::core::platform::{GameHost, SystemGameHost};
pub use crate::core::release::{GithubReleases, ReleaseSource};
pub use crate::core::tasks::Task;
