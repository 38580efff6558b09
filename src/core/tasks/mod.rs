pub mod download;
pub mod extract;

pub use download::download;
pub use extract::extract;

use std::path::PathBuf;

/// One unit of pipeline work.
///
/// Tasks are immutable value objects built once per run. Execution is strictly
/// sequential, so the archive path a `Download` writes is free by the time the
/// matching `Extract` opens it.
#[derive(Debug, Clone)]
pub enum Task {
    Download {
        url: String,
        digest: Option<String>,
        dest: PathBuf,
    },
    Extract {
        archive: PathBuf,
        output_dir: PathBuf,
    },
}

impl Task {
    /// Short human-readable label for progress displays and logs.
    pub fn label(&self) -> String {
        match self {
            Task::Download { url, .. } => format!("download {url}"),
            Task::Extract { archive, .. } => {
                let name = archive
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| archive.display().to_string());
                format!("extract {name}")
            }
        }
    }
}
