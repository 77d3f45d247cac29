//! Shared HTTP helpers for the API clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

/// HTTP request timeout for GitHub and issue-tracker calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every request; GitHub rejects requests without one.
pub(crate) const USER_AGENT: &str = concat!("release-notes-bot/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client with the standard request timeout.
pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Appends `path` to `base`, keeping any path components already in `base`.
pub(crate) fn join_url(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    url.join(path.trim_start_matches('/'))
}

/// Reads the body of a failed response for error reporting.
pub(crate) async fn error_text(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_else(|e| {
        tracing::debug!("Failed to read error response body: {e}");
        String::new()
    })
}
