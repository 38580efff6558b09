use std::time::Duration;

use reqwest::Client;

const APP_USER_AGENT: &str = "autopatch/0.1.0";

/// Shared HTTP client for release lookups and asset downloads.
///
/// Only the connect phase is bounded here; release requests add their own
/// overall timeout per call, while downloads may legitimately run long.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .connect_timeout(Duration::from_secs(30))
        .build()
}
