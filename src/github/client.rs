//! GitHub REST API client.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{CommentSink, CommitSource, GithubError, COMMITS_PER_PAGE, COMMIT_LIMIT};
use crate::data::{CommitListing, PullRequestRef};
use crate::http::{build_http_client, error_text, join_url};

/// Pages needed to reach [`COMMIT_LIMIT`].
const MAX_COMMIT_PAGES: usize = COMMIT_LIMIT.div_ceil(COMMITS_PER_PAGE);

const API_VERSION: &str = "2022-11-28";

/// Entry of the pull request commits listing.
#[derive(Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

/// Git data of a listed commit.
#[derive(Deserialize)]
struct CommitDetail {
    message: String,
}

impl CommitEntry {
    fn into_message(self) -> String {
        self.commit.message
    }
}

/// Comment creation request body.
#[derive(Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

/// Comment creation response.
#[derive(Deserialize)]
struct CreatedComment {
    id: u64,
    #[serde(default)]
    html_url: Option<String>,
}

/// GitHub REST API client.
pub struct GithubClient {
    /// HTTP client for API requests.
    client: Client,
    /// Token sent as a bearer credential.
    token: String,
    /// REST API root (e.g. "https://api.github.com").
    base_url: String,
}

impl GithubClient {
    /// Creates a new GitHub client against `base_url`.
    pub fn new(token: String, base_url: String) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            token,
            base_url,
        })
    }

    /// Builds the URL of an API path.
    fn api_url(&self, path: &str) -> Result<Url, GithubError> {
        join_url(&self.base_url, path).map_err(|e| GithubError::InvalidUrl(format!("{e}")))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION)
    }

    /// Lists the commit messages of a pull request, page by page.
    ///
    /// Pages of [`COMMITS_PER_PAGE`] are requested until a short page comes
    /// back or [`COMMIT_LIMIT`] commits have been covered.
    pub async fn list_pull_request_commits(&self, pr: &PullRequestRef) -> Result<CommitListing> {
        let mut messages = Vec::new();

        for page in 1..=MAX_COMMIT_PAGES {
            let mut url = self.api_url(&format!(
                "repos/{}/{}/pulls/{}/commits",
                pr.owner, pr.repo, pr.number
            ))?;
            url.query_pairs_mut()
                .append_pair("per_page", &COMMITS_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            debug!(url = %url, page, "Requesting pull request commits");

            let response = self
                .authorized(self.client.get(url))
                .send()
                .await
                .map_err(|e| GithubError::NetworkError(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = error_text(response).await;
                return Err(GithubError::ApiRequestFailed(format!("HTTP {status}: {body}")).into());
            }

            let entries: Vec<CommitEntry> = response
                .json()
                .await
                .map_err(|e| GithubError::InvalidResponseFormat(e.to_string()))?;

            let count = entries.len();
            debug!(page, count, "Received pull request commits page");
            messages.extend(entries.into_iter().map(CommitEntry::into_message));

            if count < COMMITS_PER_PAGE {
                break;
            }
        }

        let truncated = messages.len() >= COMMIT_LIMIT;
        info!(
            pull_request = %pr,
            commits = messages.len(),
            truncated,
            "Listed pull request commits"
        );

        Ok(CommitListing {
            messages,
            truncated,
        })
    }

    /// Creates a comment on a pull request and returns its id.
    pub async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<u64> {
        let url = self.api_url(&format!(
            "repos/{}/{}/issues/{}/comments",
            pr.owner, pr.repo, pr.number
        ))?;

        debug!(url = %url, body_len = body.len(), "Posting pull request comment");

        let response = self
            .authorized(self.client.post(url))
            .json(&NewComment { body })
            .send()
            .await
            .map_err(|e| GithubError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = error_text(response).await;
            return Err(GithubError::ApiRequestFailed(format!("HTTP {status}: {text}")).into());
        }

        let created: CreatedComment = response
            .json()
            .await
            .map_err(|e| GithubError::InvalidResponseFormat(e.to_string()))?;

        info!(
            pull_request = %pr,
            comment_id = created.id,
            comment_url = created.html_url.as_deref().unwrap_or(""),
            "Posted release notes comment"
        );

        Ok(created.id)
    }
}

impl CommitSource for GithubClient {
    fn list_commits<'a>(
        &'a self,
        pr: &'a PullRequestRef,
    ) -> Pin<Box<dyn Future<Output = Result<CommitListing>> + Send + 'a>> {
        Box::pin(self.list_pull_request_commits(pr))
    }
}

impl CommentSink for GithubClient {
    fn post_comment<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.create_comment(pr, body).await?;
            Ok(())
        })
    }
}
