use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the entire updater backend.
/// Every module returns `Result<T, UpdaterError>`.
#[derive(Debug, Error)]
pub enum UpdaterError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Release API error: {0}")]
    ReleaseApi(String),

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-256 mismatch for {path:?}: expected {expected}, got {actual}")]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("Extraction failed for {archive:?}: {reason}")]
    ExtractFailed { archive: PathBuf, reason: String },

    // ── History ledger ──────────────────────────────────
    #[error("History ledger at {path:?} is corrupt: {source}")]
    CorruptLedger {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not persist history ledger at {path:?}: {source}")]
    PersistFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Process guard ───────────────────────────────────
    #[error("The game is running; close it before updating")]
    GameRunning,

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type UpdaterResult<T> = Result<T, UpdaterError>;

impl From<std::io::Error> for UpdaterError {
    fn from(source: std::io::Error) -> Self {
        UpdaterError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
