use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};
use zip::ZipArchive;

use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::pipeline::{EventSender, PipelineEvent};

/// Unpack `archive` into `output_dir`, reporting entry-level progress.
///
/// Entries are extracted in archive order with
/// `Progress(floor(done * 100 / total))` after each. On success the archive
/// is deleted; a failed deletion is logged but not fatal, since the installed
/// content is already in place. On any entry failure the archive is left on
/// disk for diagnostics.
///
/// Synchronous; callers dispatch it to the blocking pool.
pub fn extract(archive: &Path, output_dir: &Path, events: &EventSender) -> UpdaterResult<()> {
    let file = fs::File::open(archive).map_err(|e| extract_error(archive, &e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| extract_error(archive, &e))?;

    let total = zip.len();
    for index in 0..total {
        extract_entry(&mut zip, index, archive, output_dir)?;
        let percent = (((index + 1) * 100) / total) as u8;
        let _ = events.send(PipelineEvent::Progress(percent));
    }

    match fs::remove_file(archive) {
        Ok(()) => info!("Removed archive {:?}", archive),
        Err(e) => warn!("Could not remove archive {:?}: {}", archive, e),
    }

    Ok(())
}

fn extract_entry(
    zip: &mut ZipArchive<fs::File>,
    index: usize,
    archive: &Path,
    output_dir: &Path,
) -> UpdaterResult<()> {
    let mut entry = zip
        .by_index(index)
        .map_err(|e| extract_error(archive, &e))?;

    // Reject entries whose names would escape the output directory.
    let Some(rel_path) = entry.enclosed_name() else {
        return Err(extract_error(archive, &"invalid entry path"));
    };
    let out_path = output_dir.join(rel_path);

    if entry.is_dir() {
        return fs::create_dir_all(&out_path).map_err(|source| UpdaterError::Io {
            path: out_path,
            source,
        });
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|source| UpdaterError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut out = fs::File::create(&out_path).map_err(|source| UpdaterError::Io {
        path: out_path.clone(),
        source,
    })?;
    io::copy(&mut entry, &mut out).map_err(|source| UpdaterError::Io {
        path: out_path,
        source,
    })?;

    Ok(())
}

fn extract_error(archive: &Path, reason: &dyn std::fmt::Display) -> UpdaterError {
    UpdaterError::ExtractFailed {
        archive: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}
