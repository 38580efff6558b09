// ─── Release Resolution ───
// Finds the newest downloadable asset for each configured module.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::core::config::ModuleSpec;
use crate::core::error::{UpdaterError, UpdaterResult};

const RELEASE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One published release; only the asset list matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub browser_download_url: String,
    /// `sha256:<hex>` when the host publishes one.
    #[serde(default)]
    pub digest: Option<String>,
}

/// Resolved downloadable asset for a module's newest release. Compared against
/// the history ledger by URL equality only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub download_url: String,
    pub digest: Option<String>,
}

/// Seam over the upstream release-listing endpoint.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Newest-first release listing for an `owner/repo` identifier.
    async fn releases(&self, repository: &str) -> UpdaterResult<Vec<Release>>;
}

/// GitHub-style releases API client.
pub struct GithubReleases {
    client: reqwest::Client,
    api_base: String,
}

impl GithubReleases {
    pub fn new(client: reqwest::Client, api_base: String) -> Self {
        Self { client, api_base }
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn releases(&self, repository: &str) -> UpdaterResult<Vec<Release>> {
        let url = format!("{}/repos/{}/releases", self.api_base, repository);
        let resp = self
            .client
            .get(&url)
            .timeout(RELEASE_REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpdaterError::ReleaseApi(format!(
                "release listing returned {} for {}",
                status, url
            )));
        }

        Ok(resp.json().await?)
    }
}

/// First asset of `release` whose download URL matches `pattern` starting at
/// offset 0 (anchored-start, not full-string, not search).
pub fn select_asset(release: &Release, pattern: &Regex) -> Option<ResolvedAsset> {
    release
        .assets
        .iter()
        .find(|asset| matches_at_start(pattern, &asset.browser_download_url))
        .map(|asset| ResolvedAsset {
            download_url: asset.browser_download_url.clone(),
            digest: asset.digest.clone(),
        })
}

fn matches_at_start(pattern: &Regex, text: &str) -> bool {
    pattern.find(text).map_or(false, |m| m.start() == 0)
}

/// Resolve the newest matching asset for `module`, or `None`.
///
/// Network errors, bad responses, invalid patterns and missing matches all
/// yield `None`: the module is skipped for this run and retried on the next.
/// Every failure mode leaves a log line behind.
pub async fn resolve_latest<S>(source: &S, module: &ModuleSpec) -> Option<ResolvedAsset>
where
    S: ReleaseSource + ?Sized,
{
    let pattern = match Regex::new(&module.asset_pattern) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Invalid asset pattern for {}: {}", module.repository, e);
            return None;
        }
    };

    let releases = match source.releases(&module.repository).await {
        Ok(releases) => releases,
        Err(e) => {
            warn!("Release lookup failed for {}: {}", module.repository, e);
            return None;
        }
    };

    // Element 0 is the most recent release; older ones are never consulted.
    let Some(newest) = releases.first() else {
        warn!("No releases published for {}", module.repository);
        return None;
    };

    match select_asset(newest, &pattern) {
        Some(asset) => {
            info!("Resolved {} -> {}", module.repository, asset.download_url);
            Some(asset)
        }
        None => {
            warn!(
                "No asset of {} matches pattern {:?}",
                module.repository, module.asset_pattern
            );
            None
        }
    }
}
