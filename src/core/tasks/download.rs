use std::path::Path;

use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::pipeline::{EventSender, PipelineEvent};

/// Stream `url` into `dest`, reporting byte-level progress.
///
/// The destination is created fresh (truncated if present). When the server
/// supplies a Content-Length, `Progress(floor(received * 100 / total))` is
/// emitted after every chunk; without one, no intermediate progress is
/// emitted. On failure the partial file is left behind for the caller to
/// clean up — the task itself never retries.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    digest: Option<&str>,
    dest: &Path,
    events: &EventSender,
) -> UpdaterResult<()> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpdaterError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let total_bytes = response.content_length().filter(|total| *total > 0);

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|source| UpdaterError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

    let mut stream = response.bytes_stream();
    let mut received: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|source| UpdaterError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        received = received.saturating_add(chunk.len() as u64);
        if let Some(total) = total_bytes {
            let percent = ((received * 100) / total).min(100) as u8;
            let _ = events.send(PipelineEvent::Progress(percent));
        }
    }

    file.flush().await.map_err(|source| UpdaterError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    // Handle must be closed before hashing reopens the file.
    drop(file);

    if let Some(expected) = digest {
        verify_digest(dest, expected).await?;
    }

    debug!("Downloaded {} -> {:?} ({} bytes)", url, dest, received);
    Ok(())
}

/// Check a `sha256:<hex>` release digest against the written file.
/// Unknown digest formats are skipped, not failed.
async fn verify_digest(path: &Path, expected: &str) -> UpdaterResult<()> {
    let Some(expected_hex) = expected.strip_prefix("sha256:") else {
        debug!("Skipping unrecognized digest format {:?}", expected);
        return Ok(());
    };

    let bytes = tokio::fs::read(path).await.map_err(|source| UpdaterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let actual = hex::encode(hasher.finalize());

    if !actual.eq_ignore_ascii_case(expected_hex) {
        return Err(UpdaterError::DigestMismatch {
            path: path.to_path_buf(),
            expected: expected_hex.to_string(),
            actual,
        });
    }

    Ok(())
}
